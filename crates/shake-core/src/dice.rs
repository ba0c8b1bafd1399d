use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DICE_COUNT, DEFAULT_SIDES, DICE_CAPACITY, INITIAL_FACE};

/// Side count and die count as last supplied by the UI.
///
/// Values arrive as slider floats and are rounded to the nearest integer.
/// Range limits are the UI's concern; the core stores whatever it is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceConfiguration {
    pub sides: u32,
    pub dice_count: u32,
}

impl DiceConfiguration {
    pub fn new(sides: u32, dice_count: u32) -> Self {
        Self { sides, dice_count }
    }

    pub fn set_sides(&mut self, n: f64) {
        self.sides = round_to_count(n);
    }

    pub fn set_dice_count(&mut self, n: f64) {
        self.dice_count = round_to_count(n);
    }
}

impl Default for DiceConfiguration {
    fn default() -> Self {
        Self::new(DEFAULT_SIDES, DEFAULT_DICE_COUNT)
    }
}

/// Nearest integer, half away from zero. Negative and NaN saturate to 0.
fn round_to_count(n: f64) -> u32 {
    n.round() as u32
}

/// Committed die faces in a backing array that grows on demand.
///
/// Only the first `dice_count` slots are live. The rest keep whatever they
/// last held, so shrinking and re-growing the die count re-exposes the old
/// faces instead of inventing new ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceSet {
    faces: Vec<u32>,
}

impl DiceSet {
    pub fn new() -> Self {
        Self::with_capacity(DICE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            faces: vec![INITIAL_FACE; capacity],
        }
    }

    pub fn from_faces(faces: Vec<u32>) -> Self {
        Self { faces }
    }

    pub fn capacity(&self) -> usize {
        self.faces.len()
    }

    /// Live faces for `dice_count` dice. Counts past capacity stop at capacity.
    pub fn active(&self, dice_count: u32) -> &[u32] {
        &self.faces[..self.live_len(dice_count)]
    }

    /// Sum of the live faces.
    pub fn total(&self, dice_count: u32) -> u64 {
        self.active(dice_count).iter().map(|&f| u64::from(f)).sum()
    }

    pub fn all(&self) -> &[u32] {
        &self.faces
    }

    /// Extend the backing array with `INITIAL_FACE` slots up to `dice_count`.
    /// Never shrinks.
    pub fn grow_to(&mut self, dice_count: u32) {
        let wanted = dice_count as usize;
        if wanted > self.faces.len() {
            self.faces.resize(wanted, INITIAL_FACE);
        }
    }

    fn live_len(&self, dice_count: u32) -> usize {
        (dice_count as usize).min(self.faces.len())
    }
}

impl Default for DiceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// One uniformly random face: `floor(random() * sides) + 1` with `random()` on `[0, 1)`.
///
/// A zero-sided die always shows 1.
pub fn roll_face<R: Rng + ?Sized>(sides: u32, rng: &mut R) -> u32 {
    let unit: f64 = rng.random();
    (unit * f64::from(sides)).floor() as u32 + 1
}

/// Produces committed rolls from its own random source.
///
/// The source is owned here and used for nothing else, so a seeded roller
/// gives the same committed faces regardless of how often the UI renders.
#[derive(Clone, Debug)]
pub struct DiceRoller<R> {
    rng: R,
}

impl<R: Rng> DiceRoller<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// New faces for the live slots, previous faces everywhere else.
    ///
    /// The backing array grows to `dice_count` when it is too short, so the
    /// returned set always has a face for every die.
    pub fn regenerate(&mut self, config: &DiceConfiguration, previous: &DiceSet) -> DiceSet {
        let mut next = previous.clone();
        next.grow_to(config.dice_count);
        for face in &mut next.faces[..config.dice_count as usize] {
            *face = roll_face(config.sides, &mut self.rng);
        }
        next
    }
}
