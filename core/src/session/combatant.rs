use serde::{Deserialize, Serialize};

/// What is known about the analyzed player before the stream starts.
///
/// Module activation preconditions run against this snapshot. When no
/// snapshot is available, gated modules stay inactive instead of
/// guessing at the player's build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantInfo {
    pub player_id: i64,
    #[serde(default)]
    pub talents: Vec<u32>,
}

impl CombatantInfo {
    pub fn has_talent(&self, talent: u32) -> bool {
        self.talents.contains(&talent)
    }
}
