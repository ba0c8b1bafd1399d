use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidThreshold(f64),
    ZeroCapacity(&'static str),
    ZeroSides,
    DiceCountExceedsCapacity { dice_count: u32, capacity: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidThreshold(t) => {
                write!(f, "shake threshold must be finite and non-negative, got {t}")
            }
            ConfigError::ZeroCapacity(field) => write!(f, "{field} must be at least 1"),
            ConfigError::ZeroSides => write!(f, "initial_sides must be at least 1"),
            ConfigError::DiceCountExceedsCapacity {
                dice_count,
                capacity,
            } => write!(
                f,
                "initial dice count {dice_count} exceeds dice capacity {capacity}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

pub type Result<T> = std::result::Result<T, ConfigError>;
