use crate::sample::MotionSample;

/// Motion intensity that separates idle from shaking.
/// Both directions use strict comparisons, so exactly this value never transitions.
pub const SHAKE_THRESHOLD: f64 = 1.2;

/// Baseline the sampler starts from: device at rest, face up.
pub const REST_SAMPLE: MotionSample = MotionSample {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

/// Number of recent rolls kept in the history log
pub const HISTORY_CAPACITY: usize = 5;

/// Backing slots for committed die faces. Only the first `dice_count` are live.
pub const DICE_CAPACITY: usize = 100;

/// Face every slot holds before the first roll
pub const INITIAL_FACE: u32 = 1;

pub const DEFAULT_SIDES: u32 = 6;

pub const DEFAULT_DICE_COUNT: u32 = 1;

/// Sensor delivery cadence in milliseconds (10 Hz)
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 100;
