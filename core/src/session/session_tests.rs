//! End-to-end tests for the session pipeline
//!
//! Verifies that:
//! - Events flow through admission, buff tracking, and dispatch in
//!   stream order, with buff boundaries winning timestamp ties
//! - Talent gating controls activation per module
//! - Hygiene counters record malformed and regressed events
//! - The external fetch lifecycle lands in the mitigation report

use crate::aggregates::{AggregateFetcher, AggregateFilter, FetchError, FetchOutcome};
use crate::combat_log::{CombatEvent, EventDirection, EventKind, Timestamp};
use crate::config::AnalyzerSettings;
use crate::game_data::spell_id;
use crate::modules::{Castigation, DevotionAura};

use super::{AnalysisSession, CombatantInfo, Fight};

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

const PLAYER: i64 = 7;
const BOSS_SWING: u32 = 260_000;

struct FixedFetcher {
    outcome: FetchOutcome,
}

impl AggregateFetcher for FixedFetcher {
    async fn fetch_total(&self, _filter: &AggregateFilter) -> FetchOutcome {
        self.outcome.clone()
    }
}

fn make_combatant() -> CombatantInfo {
    CombatantInfo {
        player_id: PLAYER,
        talents: vec![spell_id::CASTIGATION_TALENT, spell_id::DEVOTION_AURA_TALENT],
    }
}

fn make_session(combatant: Option<&CombatantInfo>) -> AnalysisSession {
    AnalysisSession::new(
        Fight::new(0, 100_000),
        PLAYER,
        combatant,
        &AnalyzerSettings::default(),
    )
}

fn marker(kind: EventKind, ts: Timestamp) -> CombatEvent {
    CombatEvent {
        timestamp: ts,
        kind,
        direction: EventDirection::ToActor,
        ability_id: spell_id::PROTECTION_OF_TYR,
        source_id: PLAYER,
        target_id: PLAYER,
        ..Default::default()
    }
}

fn incoming(ts: Timestamp, amount: i64) -> CombatEvent {
    CombatEvent {
        timestamp: ts,
        kind: EventKind::Damage,
        direction: EventDirection::ToActor,
        ability_id: BOSS_SWING,
        source_id: 99,
        target_id: PLAYER,
        amount,
        ..Default::default()
    }
}

fn bolt(ts: Timestamp, index: u32, amount: i64) -> CombatEvent {
    CombatEvent {
        timestamp: ts,
        kind: EventKind::Damage,
        direction: EventDirection::ByActor,
        ability_id: spell_id::PENANCE,
        source_id: PLAYER,
        amount,
        sequence_index: Some(index),
        ..Default::default()
    }
}

fn atonement(ts: Timestamp, amount: i64) -> CombatEvent {
    CombatEvent {
        timestamp: ts,
        kind: EventKind::Heal,
        direction: EventDirection::ByActor,
        ability_id: spell_id::ATONEMENT_HEAL_NON_CRIT,
        source_id: PLAYER,
        amount,
        ..Default::default()
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Stream processing
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_full_round_trip_with_resolved_aggregate() {
    let combatant = make_combatant();
    let mut session = make_session(Some(&combatant));
    session.process_stream(&[
        incoming(5_000, 50),
        marker(EventKind::ApplyBuff, 10_000),
        incoming(20_000, 50),
        marker(EventKind::RemoveBuff, 30_000),
    ]);
    assert!(session.resolve_external(Ok(50)));

    let report = session.mitigation().unwrap();
    assert_eq!(report.damage_taken_outside, 50);
    assert_eq!(report.damage_taken_during, 50);
    assert_close(report.reduced_outside, 12.5);
    assert_close(report.reduced_during, 12.5);
    assert_close(report.reduced_total, 25.0);
    assert_close(report.drps, 0.25);
    assert!(report.resolved);
    assert_eq!(session.stats().events_processed, 4);
}

#[test]
fn test_buff_boundaries_win_timestamp_ties() {
    let combatant = make_combatant();
    let mut session = make_session(Some(&combatant));
    // The hit at 10_000 is listed before the apply; the one at 30_000
    // before the removal. Both resolve against the updated buff state.
    session.process_stream(&[
        incoming(10_000, 300),
        marker(EventKind::ApplyBuff, 10_000),
        incoming(30_000, 200),
        marker(EventKind::RemoveBuff, 30_000),
    ]);

    let aura = session.module::<DevotionAura>().unwrap();
    assert_eq!(aura.damage_taken_outside(), 200);
}

#[test]
fn test_attribution_flows_through_dispatch() {
    let combatant = make_combatant();
    let mut session = make_session(Some(&combatant));
    session.process_stream(&[
        bolt(1_000, 3, 400),
        // Damage taken is keyed to the other direction and must not
        // break the attribution window.
        incoming(1_020, 500),
        atonement(1_050, 100),
    ]);

    let totals = session.attribution().unwrap();
    assert_eq!(totals.damage, 400);
    assert_eq!(totals.healing, 100);
}

#[test]
fn test_malformed_event_dropped_and_counted() {
    let combatant = make_combatant();
    let mut session = make_session(Some(&combatant));
    let mut bad = incoming(5_000, 100);
    bad.amount = -5;
    session.process_stream(&[bad, incoming(6_000, 40)]);

    assert_eq!(session.stats().malformed_events, 1);
    assert_eq!(session.stats().events_processed, 1);
    let aura = session.module::<DevotionAura>().unwrap();
    assert_eq!(aura.damage_taken_outside(), 40);
}

#[test]
fn test_regressed_timestamp_counted_but_processed() {
    let combatant = make_combatant();
    let mut session = make_session(Some(&combatant));
    session.process_stream(&[incoming(10_000, 100), incoming(4_000, 50)]);

    assert_eq!(session.stats().out_of_order_events, 1);
    assert_eq!(session.stats().events_processed, 2);
    let aura = session.module::<DevotionAura>().unwrap();
    assert_eq!(aura.damage_taken_outside(), 150);
}

// ═══════════════════════════════════════════════════════════════════════════
// Activation gating
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_no_combatant_deactivates_everything() {
    let mut session = make_session(None);
    session.process_stream(&[bolt(1_000, 3, 400), incoming(2_000, 100)]);

    assert!(session.roster().iter().all(|(_, active)| !active));
    assert!(session.attribution().is_none());
    assert!(session.mitigation().is_none());
    // Hygiene counters still run without any active module.
    assert_eq!(session.stats().events_processed, 2);
}

#[test]
fn test_talent_gating_is_per_module() {
    let combatant = CombatantInfo {
        player_id: PLAYER,
        talents: vec![spell_id::CASTIGATION_TALENT],
    };
    let session = make_session(Some(&combatant));

    assert!(session.module_active::<Castigation>());
    assert!(!session.module_active::<DevotionAura>());
    assert!(session.attribution().is_some());
    assert!(session.mitigation().is_none());
    // The inactive module stays registered and inspectable.
    assert!(session.module::<DevotionAura>().is_some());
}

// ═══════════════════════════════════════════════════════════════════════════
// External fetch lifecycle
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_fetch_lifecycle_lands_in_report() {
    let combatant = make_combatant();
    let mut session = make_session(Some(&combatant));
    session.process_stream(&[incoming(5_000, 50)]);

    session.begin_external_fetch(FixedFetcher { outcome: Ok(50) });
    assert!(session.finish_external_fetch().await);

    let report = session.mitigation().unwrap();
    assert!(report.resolved);
    assert_eq!(report.damage_taken_during, 50);
    assert_eq!(report.damage_taken_outside, 50);
}

#[tokio::test]
async fn test_poll_picks_up_finished_fetch() {
    let combatant = make_combatant();
    let mut session = make_session(Some(&combatant));
    session.begin_external_fetch(FixedFetcher { outcome: Ok(75) });

    let mut resolved = false;
    for _ in 0..100 {
        tokio::task::yield_now().await;
        if session.poll_external_fetch() {
            resolved = true;
            break;
        }
    }
    assert!(resolved);
    assert_eq!(session.mitigation().unwrap().damage_taken_during, 75);
}

#[tokio::test]
async fn test_fetch_error_leaves_report_unresolved() {
    let combatant = make_combatant();
    let mut session = make_session(Some(&combatant));
    session.begin_external_fetch(FixedFetcher {
        outcome: Err(FetchError::Server { status: 502 }),
    });
    assert!(session.finish_external_fetch().await);

    let report = session.mitigation().unwrap();
    assert!(!report.resolved);
    assert_eq!(report.damage_taken_during, 0);
    let aura = session.module::<DevotionAura>().unwrap();
    assert_eq!(
        aura.fetch_failure(),
        Some(&FetchError::Server { status: 502 })
    );
}

#[tokio::test]
async fn test_fetch_skipped_when_module_inactive() {
    let mut session = make_session(None);
    session.begin_external_fetch(FixedFetcher { outcome: Ok(10) });
    assert!(!session.finish_external_fetch().await);
}

#[tokio::test]
async fn test_fetch_not_restarted_after_resolution() {
    let combatant = make_combatant();
    let mut session = make_session(Some(&combatant));
    assert!(session.resolve_external(Ok(50)));

    session.begin_external_fetch(FixedFetcher { outcome: Ok(999) });
    assert!(!session.finish_external_fetch().await);
    assert_eq!(session.mitigation().unwrap().damage_taken_during, 50);
}

#[test]
fn test_second_resolution_ignored() {
    let combatant = make_combatant();
    let mut session = make_session(Some(&combatant));
    assert!(session.resolve_external(Ok(50)));
    assert!(!session.resolve_external(Ok(999)));

    assert_eq!(session.mitigation().unwrap().damage_taken_during, 50);
}

#[test]
fn test_poll_reflects_resolution_state() {
    let combatant = make_combatant();
    let mut session = make_session(Some(&combatant));
    assert!(!session.poll_external_fetch());

    session.resolve_external(Ok(5));
    assert!(session.poll_external_fetch());
}
