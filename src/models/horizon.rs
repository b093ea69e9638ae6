//! Planning horizon model.
//!
//! The horizon is an ordered, finite sequence of working days. Day indices
//! (0-based) are the unit of scheduling granularity; there is no sub-day
//! resolution.

use serde::{Deserialize, Serialize};

/// The ordered sequence of working days over which scheduling occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    num_days: u32,
}

impl Horizon {
    /// Creates a horizon spanning `num_days` working days.
    pub fn new(num_days: u32) -> Self {
        Self { num_days }
    }

    /// Number of working days.
    pub fn num_days(&self) -> u32 {
        self.num_days
    }

    /// Whether the horizon has no working days.
    pub fn is_empty(&self) -> bool {
        self.num_days == 0
    }

    /// Iterates over the day indices `0..num_days`.
    pub fn days(&self) -> impl Iterator<Item = u32> {
        0..self.num_days
    }

    /// Whether a day index falls within the horizon.
    pub fn contains(&self, day: u32) -> bool {
        day < self.num_days
    }
}
