use std::any::Any;
use std::fmt;

use crate::combat_log::{CombatEvent, EventDirection, EventKind};
use crate::config::CastigationSettings;
use crate::dispatch::{AnalysisModule, DispatchKey, ModuleContext};
use crate::game_data;

type HealClassifier = Box<dyn Fn(&CombatEvent) -> bool + Send + Sync>;

/// Running damage and healing credited to the bonus bolt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributionTotals {
    pub damage: i64,
    pub healing: i64,
}

/// Attributes the throughput added by the fourth Penance bolt.
///
/// Damage is direct: each damage event carries its bolt index, so the
/// bonus bolt's hits are summed as they arrive. Healing has two paths.
/// The healing Penance also reports a bolt index and is credited
/// unconditionally. Indirect heals carry no link back to the bolt, so
/// the module arms itself on the bolt's damage event and credits
/// indirect heals until any other damage by the player closes the
/// window.
pub struct Castigation {
    settings: CastigationSettings,
    classify_heal: HealClassifier,
    armed: bool,
    totals: AttributionTotals,
}

impl Castigation {
    pub fn new(settings: CastigationSettings) -> Self {
        Self {
            settings,
            classify_heal: Box::new(game_data::is_atonement_heal),
            armed: false,
            totals: AttributionTotals::default(),
        }
    }

    /// Replaces the predicate deciding which heals count as indirect.
    pub fn with_classifier<F>(mut self, classify: F) -> Self
    where
        F: Fn(&CombatEvent) -> bool + Send + Sync + 'static,
    {
        self.classify_heal = Box::new(classify);
        self
    }

    pub fn totals(&self) -> AttributionTotals {
        self.totals
    }

    /// Whether the last damage dealt was the bonus bolt.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    fn on_damage(&mut self, event: &CombatEvent) {
        let is_bonus_bolt = event.ability_id == self.settings.trigger_ability
            && event.sequence_index == Some(self.settings.trigger_index);
        if !is_bonus_bolt {
            // Any other damage the player deals breaks the link
            // between the bolt and subsequent indirect heals.
            self.armed = false;
            return;
        }
        self.armed = true;
        self.totals.damage += event.amount;
    }

    fn on_heal(&mut self, event: &CombatEvent) {
        if event.ability_id == self.settings.companion_heal_ability {
            if event.sequence_index == Some(self.settings.trigger_index) {
                self.totals.healing += event.amount;
            }
        } else if self.armed && (self.classify_heal)(event) {
            self.totals.healing += event.amount;
        }
    }
}

impl AnalysisModule for Castigation {
    fn name(&self) -> &'static str {
        "castigation"
    }

    fn subscriptions(&self) -> Vec<DispatchKey> {
        vec![
            (EventDirection::ByActor, EventKind::Damage),
            (EventDirection::ByActor, EventKind::Heal),
        ]
    }

    fn on_event(&mut self, event: &CombatEvent, _ctx: &ModuleContext<'_>) {
        match event.kind {
            EventKind::Damage => self.on_damage(event),
            EventKind::Heal => self.on_heal(event),
            _ => {}
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for Castigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Castigation")
            .field("settings", &self.settings)
            .field("armed", &self.armed)
            .field("totals", &self.totals)
            .finish_non_exhaustive()
    }
}
