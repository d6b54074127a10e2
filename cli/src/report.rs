use std::path::Path;

use serde::Deserialize;
use velen_core::aggregates::{AggregateFetcher, AggregateFilter, FetchError, FetchOutcome};
use velen_core::{CombatantInfo, Fight};

/// On-disk report fixture: one fight, one player, the raw event
/// array, and optionally the damage total the report service would
/// have returned for the aura windows.
#[derive(Debug, Deserialize)]
pub struct ReportFixture {
    pub fight: Fight,
    pub player_id: i64,
    #[serde(default)]
    pub combatant: Option<CombatantInfo>,
    pub events: Vec<serde_json::Value>,
    #[serde(default)]
    pub damage_taken_during_aura: Option<i64>,
}

impl ReportFixture {
    pub fn load(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        serde_json::from_str(&raw).map_err(|e| format!("failed to parse {}: {e}", path.display()))
    }
}

/// Fetcher backed by the fixture's embedded total, standing in for
/// the report service.
pub struct EmbeddedTotal {
    pub total: Option<i64>,
}

impl AggregateFetcher for EmbeddedTotal {
    async fn fetch_total(&self, _filter: &AggregateFilter) -> FetchOutcome {
        match self.total {
            Some(total) => Ok(total),
            None => Err(FetchError::Network {
                reason: "fixture carries no aggregate total".into(),
            }),
        }
    }
}
