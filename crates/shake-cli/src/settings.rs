//! Layered settings: `--config` path, then `SHAKE_CONFIG`, then built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use shake_core::{DEFAULT_UPDATE_INTERVAL_MS, EngineConfig};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub engine: EngineConfig,
    pub sensor: SensorSettings,
    pub ui: UiSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorSettings {
    pub update_interval_ms: u64,
}

impl SensorSettings {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
        }
    }
}

/// Slider ranges. The engine stores whatever it is given, so clamping
/// happens here before values reach it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiSettings {
    pub sides_range: [u32; 2],
    pub dice_count_range: [u32; 2],
}

impl UiSettings {
    pub fn clamp_sides(&self, n: f64) -> f64 {
        clamp_to(n, self.sides_range)
    }

    pub fn clamp_dice_count(&self, n: f64) -> f64 {
        clamp_to(n, self.dice_count_range)
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            sides_range: [2, 20],
            dice_count_range: [1, 100],
        }
    }
}

/// NaN snaps to the lower bound, like a slider that was never moved.
fn clamp_to(n: f64, [min, max]: [u32; 2]) -> f64 {
    let (min, max) = (f64::from(min), f64::from(max));
    if n.is_nan() { min } else { n.clamp(min, max) }
}

impl Settings {
    /// Resolve and load settings. An explicit path wins over the environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var("SHAKE_CONFIG").ok().map(PathBuf::from));

        let settings = match path {
            Some(path) => {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let settings = Self::from_toml(&content)
                    .with_context(|| format!("invalid settings in {}", path.display()))?;
                tracing::debug!("loaded settings from {}", path.display());
                settings
            }
            None => Self::default(),
        };
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize settings")
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        for (name, [min, max]) in [
            ("sides_range", self.ui.sides_range),
            ("dice_count_range", self.ui.dice_count_range),
        ] {
            if min > max {
                bail!("ui.{name} is empty: [{min}, {max}]");
            }
        }
        if self.ui.sides_range[0] == 0 {
            bail!("ui.sides_range must start at 1 or more");
        }
        if self.ui.dice_count_range[1] as usize > self.engine.dice_capacity {
            bail!(
                "ui.dice_count_range allows {} dice but engine.dice_capacity is {}",
                self.ui.dice_count_range[1],
                self.engine.dice_capacity
            );
        }
        Ok(())
    }
}
