use serde::{Deserialize, Serialize};

use crate::constants::SHAKE_THRESHOLD;

/// Discrete motion state derived from the intensity stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionState {
    #[default]
    Idle,
    Shaking,
}

impl MotionState {
    /// Status line shown to the user for this state.
    pub fn label(self) -> &'static str {
        match self {
            MotionState::Idle => "Waiting for rolling motion...",
            MotionState::Shaking => "Rolling...",
        }
    }

    pub fn is_shaking(self) -> bool {
        matches!(self, MotionState::Shaking)
    }
}

/// A change of motion state. Never emitted for Idle→Idle or Shaking→Shaking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: MotionState,
    pub to: MotionState,
}

impl Transition {
    /// Shaking→Idle: the only transition that commits a roll.
    pub fn is_idle_entry(self) -> bool {
        self.from == MotionState::Shaking && self.to == MotionState::Idle
    }
}

/// Two-state detector with a single threshold and strict comparisons.
///
/// Idle enters Shaking on `intensity > threshold`; Shaking returns to Idle on
/// `intensity < threshold`. An intensity exactly at the threshold holds the
/// current state in both directions, and NaN compares false so it never moves
/// the machine.
#[derive(Clone, Debug)]
pub struct MotionStateMachine {
    state: MotionState,
    threshold: f64,
}

impl MotionStateMachine {
    pub fn new() -> Self {
        Self::with_threshold(SHAKE_THRESHOLD)
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            state: MotionState::Idle,
            threshold,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Evaluate one intensity reading. Returns the transition if the state changed.
    pub fn evaluate(&mut self, intensity: f64) -> Option<Transition> {
        let next = match self.state {
            MotionState::Idle if intensity > self.threshold => MotionState::Shaking,
            MotionState::Shaking if intensity < self.threshold => MotionState::Idle,
            current => current,
        };

        if next == self.state {
            return None;
        }

        let transition = Transition {
            from: self.state,
            to: next,
        };
        self.state = next;
        tracing::debug!(
            from = ?transition.from,
            to = ?transition.to,
            intensity,
            "motion state changed"
        );
        Some(transition)
    }
}

impl Default for MotionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
