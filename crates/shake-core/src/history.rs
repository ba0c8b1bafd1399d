use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::HISTORY_CAPACITY;

/// Summary of one committed roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRecord {
    pub dice_count: u32,
    pub sides: u32,
    pub total: u64,
}

impl RollRecord {
    /// Short dice-notation label, e.g. `2d6 = 9`.
    pub fn notation(&self) -> String {
        format!("{}d{} = {}", self.dice_count, self.sides, self.total)
    }
}

/// Most recent rolls, newest first, bounded to a fixed capacity.
/// Appending past capacity drops the oldest record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLog {
    records: VecDeque<RollRecord>,
    capacity: usize,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Prepend `record` and evict anything past capacity.
    pub fn append(&mut self, record: RollRecord) -> &VecDeque<RollRecord> {
        self.records.push_front(record);
        self.records.truncate(self.capacity);
        &self.records
    }

    pub fn records(&self) -> &VecDeque<RollRecord> {
        &self.records
    }

    /// Newest-first iterator.
    pub fn iter(&self) -> impl Iterator<Item = &RollRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&RollRecord> {
        self.records.front()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}
