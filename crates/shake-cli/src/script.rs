//! Recorded sensor sessions.
//!
//! A script is JSON lines, one event per line:
//!
//! ```text
//! # comment
//! {"x": 0.0, "y": 0.0, "z": 1.0}
//! {"set_sides": 12}
//! {"set_dice_count": 3}
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shake_core::MotionSample;

/// One inbound event: a sensor reading or a slider change.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Event {
    Sample(MotionSample),
    SetSides { set_sides: f64 },
    SetDiceCount { set_dice_count: f64 },
}

impl Event {
    pub fn is_sample(&self) -> bool {
        matches!(self, Event::Sample(_))
    }
}

pub fn parse(content: &str) -> Result<Vec<Event>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| {
            serde_json::from_str(line.trim())
                .with_context(|| format!("line {}: unrecognized event: {}", idx + 1, line.trim()))
        })
        .collect()
}

pub fn load(path: &Path) -> Result<Vec<Event>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&content).with_context(|| format!("failed to parse {}", path.display()))
}
