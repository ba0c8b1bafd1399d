use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DICE_COUNT, DEFAULT_SIDES, DICE_CAPACITY, HISTORY_CAPACITY, REST_SAMPLE,
    SHAKE_THRESHOLD,
};
use crate::dice::DiceConfiguration;
use crate::error::{ConfigError, Result};
use crate::sample::MotionSample;

/// Tunables for a [`RollEngine`](crate::engine::RollEngine).
///
/// Every field has a default, so a partial `[engine]` table deserializes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub shake_threshold: f64,
    pub history_capacity: usize,
    pub dice_capacity: usize,
    pub initial_sides: u32,
    pub initial_dice_count: u32,
    pub rest_sample: MotionSample,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.shake_threshold.is_finite() || self.shake_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.shake_threshold));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("history_capacity"));
        }
        if self.dice_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("dice_capacity"));
        }
        if self.initial_sides == 0 {
            return Err(ConfigError::ZeroSides);
        }
        if self.initial_dice_count as usize > self.dice_capacity {
            return Err(ConfigError::DiceCountExceedsCapacity {
                dice_count: self.initial_dice_count,
                capacity: self.dice_capacity,
            });
        }
        Ok(())
    }

    pub fn initial_dice(&self) -> DiceConfiguration {
        DiceConfiguration::new(self.initial_sides, self.initial_dice_count)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shake_threshold: SHAKE_THRESHOLD,
            history_capacity: HISTORY_CAPACITY,
            dice_capacity: DICE_CAPACITY,
            initial_sides: DEFAULT_SIDES,
            initial_dice_count: DEFAULT_DICE_COUNT,
            rest_sample: REST_SAMPLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_nan_threshold() {
        let config = EngineConfig {
            shake_threshold: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_rejects_zero_capacities() {
        let config = EngineConfig {
            history_capacity: 0,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCapacity("history_capacity"))
        );

        let config = EngineConfig {
            dice_capacity: 0,
            initial_dice_count: 0,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCapacity("dice_capacity"))
        );
    }

    #[test]
    fn test_rejects_dice_count_past_capacity() {
        let config = EngineConfig {
            dice_capacity: 50,
            initial_dice_count: 51,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "initial dice count 51 exceeds dice capacity 50"
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"initial_sides": 20}"#).unwrap();
        assert_eq!(config.initial_sides, 20);
        assert_eq!(config.shake_threshold, SHAKE_THRESHOLD);
        assert_eq!(config.history_capacity, HISTORY_CAPACITY);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = serde_json::from_str::<EngineConfig>(r#"{"threshold": 2.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_sides() {
        let config = EngineConfig {
            initial_sides: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSides));
        assert_eq!(
            ConfigError::ZeroSides.to_string(),
            "initial_sides must be at least 1"
        );
    }
}
