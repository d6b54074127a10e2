//! Buff tracking handler
//!
//! Builds interval lists from apply/remove boundary events and serves
//! membership queries for any point in the fight. Queries never
//! mutate; modules can only observe.

use hashbrown::HashMap;

use crate::combat_log::{CombatEvent, EventKind, Timestamp};

use super::{BuffInterval, BuffKey};

/// Interval store for buff and debuff activity.
///
/// Boundary handling is deliberately forgiving: a removal without a
/// matching application and a re-application over an open span are
/// both logged no-ops, since truncated streams produce them routinely.
#[derive(Debug, Clone, Default)]
pub struct BuffTracker {
    /// Spans per buff instance, in stream order. At most the last span
    /// of a list can be open.
    intervals: HashMap<BuffKey, Vec<BuffInterval>>,
}

impl BuffTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one event to the matching boundary handler. Events that
    /// do not change buff state are ignored.
    pub fn observe(&mut self, event: &CombatEvent) {
        let key = BuffKey {
            ability_id: event.ability_id,
            source_id: event.source_id,
            target_id: event.target_id,
        };
        match event.kind {
            EventKind::ApplyBuff | EventKind::ApplyDebuff => self.on_apply(key, event.timestamp),
            EventKind::RemoveBuff | EventKind::RemoveDebuff => self.on_remove(key, event.timestamp),
            EventKind::ApplyBuffStack => self.on_stack_change(key, 1),
            EventKind::RemoveBuffStack => self.on_stack_change(key, -1),
            // Refresh extends the effect in game terms but the span
            // boundaries only move on apply/remove.
            EventKind::RefreshBuff => {}
            _ => {}
        }
    }

    fn on_apply(&mut self, key: BuffKey, at: Timestamp) {
        let spans = self.intervals.entry(key).or_default();
        if let Some(last) = spans.last()
            && last.is_open()
        {
            tracing::debug!(
                ability_id = key.ability_id,
                at,
                "apply while already active, keeping original boundary"
            );
            return;
        }
        spans.push(BuffInterval::open(at));
    }

    fn on_remove(&mut self, key: BuffKey, at: Timestamp) {
        let Some(spans) = self.intervals.get_mut(&key) else {
            tracing::debug!(ability_id = key.ability_id, at, "removal without application, ignoring");
            return;
        };
        match spans.last_mut() {
            Some(last) if last.is_open() => last.end = Some(at),
            _ => {
                tracing::debug!(ability_id = key.ability_id, at, "removal while not active, ignoring");
            }
        }
    }

    fn on_stack_change(&mut self, key: BuffKey, delta: i32) {
        if let Some(spans) = self.intervals.get_mut(&key)
            && let Some(last) = spans.last_mut()
            && last.is_open()
        {
            last.stacks = last.stacks.saturating_add_signed(delta);
        }
    }

    /// Whether the buff instance was active at `t`. Closed spans cover
    /// `[start, end)`; a span with no removal covers everything from
    /// its start onward.
    pub fn is_active(&self, key: BuffKey, t: Timestamp) -> bool {
        self.intervals
            .get(&key)
            .is_some_and(|spans| spans.iter().any(|span| span.contains(t)))
    }

    /// Stack count at `t`, 0 when the buff was not active.
    pub fn stack_count(&self, key: BuffKey, t: Timestamp) -> u32 {
        self.intervals
            .get(&key)
            .and_then(|spans| spans.iter().find(|span| span.contains(t)))
            .map_or(0, |span| span.stacks)
    }

    /// Total active milliseconds up to `through`.
    pub fn uptime_ms(&self, key: BuffKey, through: Timestamp) -> i64 {
        self.intervals.get(&key).map_or(0, |spans| {
            spans.iter().map(|span| span.duration_through(through)).sum()
        })
    }

    /// All recorded spans for a buff instance, in stream order.
    pub fn intervals(&self, key: BuffKey) -> &[BuffInterval] {
        self.intervals.get(&key).map_or(&[], Vec::as_slice)
    }
}
