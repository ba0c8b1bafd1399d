use serde::{Deserialize, Serialize};

use crate::constants::REST_SAMPLE;

/// One accelerometer reading, per-axis, in units of g (magnitude ≈ 1 at rest).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl MotionSample {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Mean absolute per-axis difference between two readings.
    /// NaN on any axis yields NaN.
    pub fn intensity_from(self, previous: Self) -> f64 {
        ((previous.x - self.x).abs() + (previous.y - self.y).abs() + (previous.z - self.z).abs())
            / 3.0
    }
}

impl Default for MotionSample {
    fn default() -> Self {
        REST_SAMPLE
    }
}

/// Turns raw readings into a scalar motion intensity.
///
/// Remembers only the most recent reading; each new sample is compared
/// against it and then replaces it.
#[derive(Clone, Debug)]
pub struct SensorSampler {
    previous: MotionSample,
}

impl SensorSampler {
    pub fn new() -> Self {
        Self::with_baseline(REST_SAMPLE)
    }

    pub fn with_baseline(baseline: MotionSample) -> Self {
        Self { previous: baseline }
    }

    /// Intensity of `raw` relative to the last reading, then remember `raw`.
    pub fn on_sample(&mut self, raw: MotionSample) -> f64 {
        let intensity = raw.intensity_from(self.previous);
        self.previous = raw;
        intensity
    }

    pub fn previous(&self) -> MotionSample {
        self.previous
    }
}

impl Default for SensorSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_sample_compares_against_rest() {
        let mut sampler = SensorSampler::new();
        let intensity = sampler.on_sample(MotionSample::new(0.0, 0.0, 1.0));
        assert_eq!(intensity, 0.0);
    }

    #[test]
    fn test_mean_of_absolute_axis_deltas() {
        let mut sampler = SensorSampler::new();
        // |0-1.5| + |0-(-0.9)| + |1-(-0.6)| = 1.5 + 0.9 + 1.6 = 4.0
        let intensity = sampler.on_sample(MotionSample::new(1.5, -0.9, -0.6));
        assert_relative_eq!(intensity, 4.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_baseline_replaced_after_each_sample() {
        let mut sampler = SensorSampler::new();
        let shaken = MotionSample::new(2.0, 2.0, 2.0);
        sampler.on_sample(shaken);
        assert_eq!(sampler.previous(), shaken);

        // Same reading again: no change, no intensity
        assert_eq!(sampler.on_sample(shaken), 0.0);
    }

    #[test]
    fn test_nan_axis_propagates() {
        let mut sampler = SensorSampler::new();
        let intensity = sampler.on_sample(MotionSample::new(f64::NAN, 0.0, 1.0));
        assert!(intensity.is_nan());

        // NaN baseline keeps poisoning the next reading on that axis
        let next = sampler.on_sample(MotionSample::new(0.0, 0.0, 1.0));
        assert!(next.is_nan());

        // Once the baseline is finite again, intensity recovers
        let recovered = sampler.on_sample(MotionSample::new(0.0, 0.0, 1.0));
        assert_eq!(recovered, 0.0);
    }

    #[test]
    fn test_custom_baseline() {
        let mut sampler = SensorSampler::with_baseline(MotionSample::new(0.0, -1.0, 0.0));
        let intensity = sampler.on_sample(MotionSample::new(0.0, -1.0, 0.0));
        assert_eq!(intensity, 0.0);
    }

    #[test]
    fn test_default_sample_is_rest() {
        assert_eq!(MotionSample::default(), MotionSample::new(0.0, 0.0, 1.0));
    }
}
