//! Per-fight analysis session
//!
//! One session owns everything the analysis of a single player's
//! fight needs:
//! - The module host, with the built-in modules activated against the
//!   combatant snapshot
//! - The buff tracker, fed ahead of same-timestamp consumers
//! - Stream hygiene counters for malformed and regressed events
//! - The lifecycle of the external aggregate fetch

mod combatant;
mod fight;

#[cfg(test)]
mod session_tests;

pub use combatant::CombatantInfo;
pub use fight::Fight;

use crate::aggregates::{AggregateFetcher, FetchOutcome, PendingAggregate};
use crate::buffs::BuffTracker;
use crate::combat_log::{CombatEvent, Timestamp};
use crate::config::AnalyzerSettings;
use crate::dispatch::{ActivationContext, AnalysisModule, ModuleContext, ModuleHost};
use crate::modules::{AttributionTotals, Castigation, DevotionAura, MitigationReport};

/// Stream quality counters. A bad event never aborts the run; these
/// record what the run had to work around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub events_processed: u64,
    pub malformed_events: u64,
    pub out_of_order_events: u64,
}

/// Drives one player's fight through the module pipeline.
pub struct AnalysisSession {
    fight: Fight,
    player_id: i64,
    buffs: BuffTracker,
    host: ModuleHost,
    stats: StreamStats,
    last_timestamp: Option<Timestamp>,
    pending_fetch: Option<PendingAggregate>,
}

impl AnalysisSession {
    /// Builds a session for one player in one fight. Each built-in
    /// module activates only if the snapshot shows its talent.
    pub fn new(
        fight: Fight,
        player_id: i64,
        combatant: Option<&CombatantInfo>,
        settings: &AnalyzerSettings,
    ) -> Self {
        let ctx = ActivationContext { combatant };
        let mut host = ModuleHost::new();

        let castigation_talent = settings.castigation.talent;
        host.activate(
            Box::new(Castigation::new(settings.castigation.clone())),
            &ctx,
            |ctx| {
                ctx.combatant
                    .is_some_and(|c| c.has_talent(castigation_talent))
            },
        );

        let aura_talent = settings.devotion_aura.talent;
        host.activate(
            Box::new(DevotionAura::new(settings.devotion_aura.clone(), player_id)),
            &ctx,
            |ctx| ctx.combatant.is_some_and(|c| c.has_talent(aura_talent)),
        );

        Self {
            fight,
            player_id,
            buffs: BuffTracker::new(),
            host,
            stats: StreamStats::default(),
            last_timestamp: None,
            pending_fetch: None,
        }
    }

    /// Feeds an ordered event slice through the pipeline.
    ///
    /// Events sharing a timestamp form one run: buff boundaries are
    /// delivered first, then the rest, so membership queries at that
    /// timestamp already see the updated buff state.
    pub fn process_stream(&mut self, events: &[CombatEvent]) {
        let mut i = 0;
        while i < events.len() {
            let ts = events[i].timestamp;
            let mut j = i;
            while j < events.len() && events[j].timestamp == ts {
                j += 1;
            }
            let run = &events[i..j];
            for event in run {
                if event.kind.is_buff_boundary() && self.admit(event) {
                    self.buffs.observe(event);
                    self.dispatch(event);
                }
            }
            for event in run {
                if !event.kind.is_buff_boundary() && self.admit(event) {
                    self.dispatch(event);
                }
            }
            i = j;
        }
    }

    /// Validity and ordering gate. Malformed events are dropped;
    /// regressed timestamps are counted but still processed.
    fn admit(&mut self, event: &CombatEvent) -> bool {
        if let Err(err) = event.validate() {
            self.stats.malformed_events += 1;
            tracing::warn!(error = %err, timestamp = event.timestamp, "dropping malformed event");
            return false;
        }
        if let Some(last) = self.last_timestamp
            && event.timestamp < last
        {
            self.stats.out_of_order_events += 1;
            tracing::warn!(timestamp = event.timestamp, last, "timestamp regressed");
        } else {
            self.last_timestamp = Some(event.timestamp);
        }
        self.stats.events_processed += 1;
        true
    }

    fn dispatch(&mut self, event: &CombatEvent) {
        let ctx = ModuleContext {
            fight: &self.fight,
            buffs: &self.buffs,
        };
        self.host.dispatch(event, &ctx);
    }

    // ───────────────────────────────────────────────────────────────────────
    // External aggregate lifecycle
    // ───────────────────────────────────────────────────────────────────────

    /// Starts the external fetch for the mitigation module's during
    /// bucket. Does nothing when the module is inactive, a fetch is
    /// already in flight, or an outcome has already been applied.
    pub fn begin_external_fetch<F>(&mut self, fetcher: F)
    where
        F: AggregateFetcher + Send + 'static,
    {
        if self.pending_fetch.is_some() || !self.host.is_active::<DevotionAura>() {
            return;
        }
        let Some(aura) = self.host.get::<DevotionAura>() else {
            return;
        };
        if aura.is_resolved() {
            return;
        }
        let filter = aura.filter(&self.fight);
        tracing::debug!(
            start = filter.start,
            end = filter.end,
            "starting external aggregate fetch"
        );
        self.pending_fetch = Some(PendingAggregate::spawn(fetcher, filter));
    }

    /// Applies the fetch outcome if it has arrived, without blocking.
    /// Returns whether the aggregate is resolved after the call.
    pub fn poll_external_fetch(&mut self) -> bool {
        if let Some(pending) = self.pending_fetch.as_mut()
            && let Some(outcome) = pending.try_take()
        {
            self.pending_fetch = None;
            self.resolve_external(outcome);
        }
        self.host
            .get::<DevotionAura>()
            .is_some_and(DevotionAura::is_resolved)
    }

    /// Waits for the in-flight fetch and applies its outcome. Returns
    /// whether an outcome was applied.
    pub async fn finish_external_fetch(&mut self) -> bool {
        let Some(pending) = self.pending_fetch.take() else {
            return false;
        };
        let outcome = pending.wait().await;
        self.resolve_external(outcome)
    }

    /// Applies a fetch outcome directly. The first outcome wins.
    pub fn resolve_external(&mut self, outcome: FetchOutcome) -> bool {
        match self.host.get_mut::<DevotionAura>() {
            Some(aura) => aura.resolve(outcome),
            None => false,
        }
    }

    // ───────────────────────────────────────────────────────────────────────
    // Read access
    // ───────────────────────────────────────────────────────────────────────

    pub fn fight(&self) -> &Fight {
        &self.fight
    }

    pub fn player_id(&self) -> i64 {
        self.player_id
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn buffs(&self) -> &BuffTracker {
        &self.buffs
    }

    /// Typed access to a registered module.
    pub fn module<M: AnalysisModule + 'static>(&self) -> Option<&M> {
        self.host.get::<M>()
    }

    pub fn module_active<M: AnalysisModule + 'static>(&self) -> bool {
        self.host.is_active::<M>()
    }

    /// Name and activation state of every registered module.
    pub fn roster(&self) -> Vec<(&'static str, bool)> {
        self.host.roster()
    }

    /// Bonus-bolt totals, present only while that module is active.
    pub fn attribution(&self) -> Option<AttributionTotals> {
        if !self.host.is_active::<Castigation>() {
            return None;
        }
        self.host.get::<Castigation>().map(Castigation::totals)
    }

    /// Mitigation estimate, present only while that module is active.
    pub fn mitigation(&self) -> Option<MitigationReport> {
        if !self.host.is_active::<DevotionAura>() {
            return None;
        }
        self.host
            .get::<DevotionAura>()
            .map(|aura| aura.report(&self.fight))
    }
}
