//! Buff interval records (runtime state)

use crate::combat_log::Timestamp;

/// Identifies one buff instance: which aura, applied by whom, on whom.
///
/// The source matters: the same aura applied by two different actors
/// is two separate instances with independent intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuffKey {
    pub ability_id: u32,
    pub source_id: i64,
    pub target_id: i64,
}

/// One contiguous span of a buff being active.
///
/// `end` is `None` while the buff is still open. A closed span covers
/// `[start, end)`: the removal instant itself no longer counts as
/// active. An open span covers every instant at or after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuffInterval {
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    /// Latest stack count while the span was open
    pub stacks: u32,
}

impl BuffInterval {
    pub fn open(start: Timestamp) -> Self {
        Self {
            start,
            end: None,
            stacks: 1,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Whether this span covers `t`.
    pub fn contains(&self, t: Timestamp) -> bool {
        match self.end {
            Some(end) => self.start <= t && t < end,
            None => self.start <= t,
        }
    }

    /// Covered milliseconds up to `through`; open spans are clamped.
    pub fn duration_through(&self, through: Timestamp) -> i64 {
        let end = self.end.unwrap_or(through).min(through);
        (end - self.start).max(0)
    }
}
