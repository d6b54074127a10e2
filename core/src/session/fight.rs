use serde::{Deserialize, Serialize};

use crate::combat_log::Timestamp;

/// Boundaries of the encounter under analysis.
///
/// All rate math runs against this window rather than the first and
/// last event seen, so sparse streams do not inflate per-second
/// numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fight {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Fight {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn duration_ms(&self) -> i64 {
        (self.end - self.start).max(0)
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_ms() as f64 / 1_000.0
    }
}
