//! Shake-to-roll dice engine.
//!
//! Accelerometer samples become a scalar motion intensity, the intensity
//! drives a two-state idle/shaking machine, and every shaking→idle edge
//! commits a fresh roll and appends it to a short history.
//!
//! Zero I/O: the sensor subscription and the UI live with the caller.

pub mod config;
pub mod constants;
pub mod dice;
pub mod engine;
pub mod error;
pub mod history;
pub mod motion;
pub mod sample;

pub use config::EngineConfig;
pub use constants::{
    DEFAULT_UPDATE_INTERVAL_MS, DICE_CAPACITY, HISTORY_CAPACITY, REST_SAMPLE, SHAKE_THRESHOLD,
};
pub use dice::{DiceConfiguration, DiceRoller, DiceSet, roll_face};
pub use engine::{EngineSnapshot, RollEngine, SampleOutcome, SensorStatus};
pub use error::{ConfigError, Result};
pub use history::{HistoryLog, RollRecord};
pub use motion::{MotionState, MotionStateMachine, Transition};
pub use sample::{MotionSample, SensorSampler};
