//! Typed combat events
//!
//! An event is immutable once produced. There are no links between
//! events; stream position is the only causal order, and every module
//! that correlates events does so by walking that order.

use serde::{Deserialize, Serialize};

use super::EventFault;

/// Milliseconds relative to the report epoch. Fight bounds and buff
/// intervals use the same clock.
pub type Timestamp = i64;

/// What an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Damage,
    Heal,
    Absorbed,
    ApplyBuff,
    RefreshBuff,
    RemoveBuff,
    ApplyBuffStack,
    RemoveBuffStack,
    ApplyDebuff,
    RemoveDebuff,
    Cast,
    BeginCast,
    Energize,
}

impl EventKind {
    /// Kinds that change buff tracker state. At equal timestamps these
    /// are applied before anything that reads buff membership.
    pub fn is_buff_boundary(&self) -> bool {
        matches!(
            self,
            Self::ApplyBuff
                | Self::RefreshBuff
                | Self::RemoveBuff
                | Self::ApplyBuffStack
                | Self::RemoveBuffStack
                | Self::ApplyDebuff
                | Self::RemoveDebuff
        )
    }
}

/// Whether the subject player produced the event or received it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventDirection {
    /// Produced by the subject player (their damage, their heals)
    #[default]
    ByActor,
    /// Inflicted on the subject player
    ToActor,
}

/// One entry in the event stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub timestamp: Timestamp,
    pub kind: EventKind,
    pub direction: EventDirection,

    /// Ability or buff that produced the event
    pub ability_id: u32,
    #[serde(default)]
    pub source_id: i64,
    #[serde(default)]
    pub target_id: i64,

    /// Effective damage or healing
    #[serde(default)]
    pub amount: i64,
    /// Portion soaked by absorption shields, reported alongside damage
    #[serde(default)]
    pub absorbed: i64,

    /// Position within a multi-hit cast, when the upstream annotator
    /// could work it out. Absent for single-hit abilities.
    #[serde(default)]
    pub sequence_index: Option<u32>,
}

impl CombatEvent {
    /// Check the field-level invariants the analyzers assume.
    pub fn validate(&self) -> Result<(), EventFault> {
        if self.timestamp < 0 {
            return Err(EventFault::NegativeTimestamp(self.timestamp));
        }
        if self.amount < 0 {
            return Err(EventFault::NegativeAmount(self.amount));
        }
        if self.absorbed < 0 {
            return Err(EventFault::NegativeAbsorbed(self.absorbed));
        }
        Ok(())
    }
}
