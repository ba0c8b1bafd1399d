//! Session state for one active dice screen.
//!
//! [`RollEngine`] owns everything that changes during a session: the sampler
//! baseline, the motion state, the committed dice, the configuration and the
//! history. Samples enter through [`RollEngine::on_sample`], the only call
//! that can move the state machine. Everything the UI draws comes from
//! `&self` views, so rendering can never mutate the session.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::dice::{DiceConfiguration, DiceRoller, DiceSet, roll_face};
use crate::error::Result;
use crate::history::{HistoryLog, RollRecord};
use crate::motion::{MotionState, MotionStateMachine, Transition};
use crate::sample::{MotionSample, SensorSampler};

/// Whether the motion sensor could be subscribed to at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    #[default]
    Available,
    Unavailable,
}

impl SensorStatus {
    /// Advisory text for the UI, if any.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            SensorStatus::Available => None,
            SensorStatus::Unavailable => Some("Accelerometer unavailable on this device"),
        }
    }
}

/// What a single sample did to the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleOutcome {
    pub intensity: f64,
    pub transition: Option<Transition>,
    /// Set only on Idle-entry.
    pub roll: Option<RollRecord>,
}

/// Read-only view of the session for rendering or export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub state: MotionState,
    pub status: String,
    pub sensor: SensorStatus,
    pub intensity: Option<f64>,
    pub dice: DiceConfiguration,
    pub faces: Vec<u32>,
    pub total: u64,
    pub history: Vec<RollRecord>,
}

pub struct RollEngine<R> {
    sampler: SensorSampler,
    machine: MotionStateMachine,
    roller: DiceRoller<R>,
    dice: DiceSet,
    config: DiceConfiguration,
    history: HistoryLog,
    sensor: SensorStatus,
    last_intensity: Option<f64>,
}

impl<R: Rng> RollEngine<R> {
    /// Engine with default tuning. `rng` drives committed rolls only.
    pub fn new(rng: R) -> Self {
        Self::build(&EngineConfig::default(), rng)
    }

    pub fn with_config(config: &EngineConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    fn build(config: &EngineConfig, rng: R) -> Self {
        Self {
            sampler: SensorSampler::with_baseline(config.rest_sample),
            machine: MotionStateMachine::with_threshold(config.shake_threshold),
            roller: DiceRoller::new(rng),
            dice: DiceSet::with_capacity(config.dice_capacity),
            config: config.initial_dice(),
            history: HistoryLog::with_capacity(config.history_capacity),
            sensor: SensorStatus::Available,
            last_intensity: None,
        }
    }

    /// Record the result of the one-time availability query.
    pub fn set_sensor_status(&mut self, status: SensorStatus) {
        if let Some(notice) = status.notice() {
            tracing::warn!("{notice}; dice will stay idle");
        }
        self.sensor = status;
    }

    /// Feed one sensor reading through sampler, state machine and, on
    /// Idle-entry, the roller and history.
    pub fn on_sample(&mut self, raw: MotionSample) -> SampleOutcome {
        let intensity = self.sampler.on_sample(raw);
        self.last_intensity = Some(intensity);

        let transition = self.machine.evaluate(intensity);
        let roll = match transition {
            Some(t) if t.is_idle_entry() => Some(self.commit_roll()),
            _ => None,
        };

        SampleOutcome {
            intensity,
            transition,
            roll,
        }
    }

    /// Regenerate the live dice and log the result.
    ///
    /// The total is taken from the freshly regenerated set, never from the
    /// faces that were on display while shaking.
    pub fn commit_roll(&mut self) -> RollRecord {
        self.dice = self.roller.regenerate(&self.config, &self.dice);
        let record = RollRecord {
            dice_count: self.config.dice_count,
            sides: self.config.sides,
            total: self.dice.total(self.config.dice_count),
        };
        self.history.append(record);
        tracing::info!(
            dice = record.dice_count,
            sides = record.sides,
            total = record.total,
            "roll committed"
        );
        record
    }

    pub fn set_sides(&mut self, n: f64) {
        self.config.set_sides(n);
        tracing::debug!(requested = n, sides = self.config.sides, "sides updated");
    }

    pub fn set_dice_count(&mut self, n: f64) {
        self.config.set_dice_count(n);
        self.dice.grow_to(self.config.dice_count);
        tracing::debug!(
            requested = n,
            dice_count = self.config.dice_count,
            "dice count updated"
        );
    }
}

impl<R> RollEngine<R> {
    pub fn state(&self) -> MotionState {
        self.machine.state()
    }

    pub fn dice_config(&self) -> DiceConfiguration {
        self.config
    }

    pub fn sensor_status(&self) -> SensorStatus {
        self.sensor
    }

    /// Intensity of the most recent sample, `None` before the first one.
    pub fn last_intensity(&self) -> Option<f64> {
        self.last_intensity
    }

    /// Committed faces for the current die count.
    pub fn committed_faces(&self) -> &[u32] {
        self.dice.active(self.config.dice_count)
    }

    pub fn committed_total(&self) -> u64 {
        self.dice.total(self.config.dice_count)
    }

    pub fn dice_set(&self) -> &DiceSet {
        &self.dice
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Face to draw for die `index`.
    ///
    /// While shaking this is a throwaway random face from `rng`; otherwise it
    /// is the committed face. Nothing drawn here is ever stored.
    pub fn peek_display_value<D: Rng + ?Sized>(&self, index: usize, rng: &mut D) -> Option<u32> {
        let committed = *self.committed_faces().get(index)?;
        if self.state().is_shaking() {
            Some(roll_face(self.config.sides, rng))
        } else {
            Some(committed)
        }
    }

    pub fn peek_display_values<D: Rng + ?Sized>(&self, rng: &mut D) -> Vec<u32> {
        (0..self.committed_faces().len())
            .filter_map(|i| self.peek_display_value(i, rng))
            .collect()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            state: self.state(),
            status: self.state().label().to_string(),
            sensor: self.sensor,
            intensity: self.last_intensity,
            dice: self.config,
            faces: self.committed_faces().to_vec(),
            total: self.committed_total(),
            history: self.history.iter().copied().collect(),
        }
    }
}

impl<R> std::fmt::Debug for RollEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollEngine")
            .field("state", &self.state())
            .field("config", &self.config)
            .field("sensor", &self.sensor)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}
