use std::any::Any;

use crate::aggregates::{AggregateFilter, FetchError, FetchOutcome, LazyAggregate};
use crate::buffs::BuffKey;
use crate::combat_log::{CombatEvent, EventDirection, EventKind};
use crate::config::DevotionAuraSettings;
use crate::dispatch::{AnalysisModule, DispatchKey, ModuleContext};
use crate::session::Fight;

/// Mitigation estimate assembled from both damage buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MitigationReport {
    pub damage_taken_during: i64,
    pub damage_taken_outside: i64,
    pub reduced_during: f64,
    pub reduced_outside: f64,
    pub reduced_total: f64,
    /// Damage reduction per second across the fight.
    pub drps: f64,
    /// False until the external total has actually arrived; the
    /// during bucket reads as zero in that state.
    pub resolved: bool,
}

/// Estimates the damage the aura prevented.
///
/// Incoming damage is split around the marker buff the aura applies to
/// its owner. Hits outside the marker's windows are summed straight
/// off the stream. Hits during them cannot be isolated locally and
/// come from an external aggregate query over the same windows. Each
/// bucket is scaled from post-mitigation damage to prevented damage
/// with the flat reduction factor.
#[derive(Debug)]
pub struct DevotionAura {
    settings: DevotionAuraSettings,
    player_id: i64,
    during: LazyAggregate,
    outside: i64,
}

impl DevotionAura {
    pub fn new(settings: DevotionAuraSettings, player_id: i64) -> Self {
        Self {
            settings,
            player_id,
            during: LazyAggregate::default(),
            outside: 0,
        }
    }

    /// Filter for the external query: the fight window, restricted to
    /// spans where the player's own marker was on the player.
    pub fn filter(&self, fight: &Fight) -> AggregateFilter {
        AggregateFilter {
            start: fight.start,
            end: fight.end,
            target_id: self.player_id,
            buff_ability_id: self.settings.marker_buff,
            buff_source_id: self.player_id,
        }
    }

    /// Records the fetch outcome. The first outcome wins; returns
    /// whether this call resolved the aggregate.
    pub fn resolve(&mut self, outcome: FetchOutcome) -> bool {
        if self.during.is_resolved() {
            tracing::debug!("external aggregate already resolved, ignoring");
            return false;
        }
        match &outcome {
            Ok(total) => tracing::debug!(total, "external damage total received"),
            Err(err) => tracing::warn!(error = %err, "external damage fetch failed"),
        }
        self.during.resolve(outcome)
    }

    /// Whether a fetch outcome has been recorded, success or failure.
    pub fn is_resolved(&self) -> bool {
        self.during.is_resolved()
    }

    pub fn fetch_failure(&self) -> Option<&FetchError> {
        self.during.failure()
    }

    pub fn damage_taken_outside(&self) -> i64 {
        self.outside
    }

    /// Snapshot of the estimate as currently known.
    pub fn report(&self, fight: &Fight) -> MitigationReport {
        let during = self.during.external().unwrap_or(0);
        let reduced_during = self.reduced(during);
        let reduced_outside = self.reduced(self.outside);
        let reduced_total = reduced_during + reduced_outside;
        let secs = fight.duration_secs();
        let drps = if secs > 0.0 { reduced_total / secs } else { 0.0 };
        MitigationReport {
            damage_taken_during: during,
            damage_taken_outside: self.outside,
            reduced_during,
            reduced_outside,
            reduced_total,
            drps,
            resolved: self.during.has_external(),
        }
    }

    /// taken / (1 - f) recovers the unmitigated total; times f is the
    /// slice that never landed.
    fn reduced(&self, taken: i64) -> f64 {
        let f = self.settings.reduction;
        taken as f64 / (1.0 - f) * f
    }

    fn on_damage_taken(&mut self, event: &CombatEvent, ctx: &ModuleContext<'_>) {
        if self.settings.ignored_abilities.contains(&event.ability_id) {
            return;
        }
        let marker = BuffKey {
            ability_id: self.settings.marker_buff,
            source_id: self.player_id,
            target_id: self.player_id,
        };
        if !ctx.buffs.is_active(marker, event.timestamp) {
            self.outside += event.amount + event.absorbed;
        }
    }
}

impl AnalysisModule for DevotionAura {
    fn name(&self) -> &'static str {
        "devotion_aura"
    }

    fn subscriptions(&self) -> Vec<DispatchKey> {
        vec![(EventDirection::ToActor, EventKind::Damage)]
    }

    fn on_event(&mut self, event: &CombatEvent, ctx: &ModuleContext<'_>) {
        self.on_damage_taken(event, ctx);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
