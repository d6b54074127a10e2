//! Module host: activation, routing table, sequential dispatch

use hashbrown::HashSet;

use crate::combat_log::CombatEvent;
use crate::session::CombatantInfo;

use super::{AnalysisModule, DispatchKey, ModuleContext};

/// Data available when deciding whether a module should run at all.
///
/// Combatant info can be missing when the upstream report is broken;
/// a precondition that needs it treats absence as "not selected", so
/// the module deactivates instead of the analysis failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivationContext<'a> {
    pub combatant: Option<&'a CombatantInfo>,
}

struct ModuleSlot {
    module: Box<dyn AnalysisModule>,
    active: bool,
    /// Subscription keys frozen from `subscriptions()` at activation
    keys: HashSet<DispatchKey>,
}

/// Owns the analysis modules and fans events out to them.
///
/// Dispatch is sequential in registration order, one event at a time,
/// so a module may rely on having seen every earlier subscribed event
/// before the current one.
#[derive(Default)]
pub struct ModuleHost {
    slots: Vec<ModuleSlot>,
}

impl ModuleHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. The precondition runs exactly once, here,
    /// against the activation context; the module never re-evaluates
    /// it per event.
    pub fn activate<F>(
        &mut self,
        module: Box<dyn AnalysisModule>,
        ctx: &ActivationContext<'_>,
        precondition: F,
    ) where
        F: FnOnce(&ActivationContext<'_>) -> bool,
    {
        let active = precondition(ctx);
        let keys: HashSet<DispatchKey> = module.subscriptions().into_iter().collect();
        tracing::debug!(module = module.name(), active, "module activation");
        self.slots.push(ModuleSlot {
            module,
            active,
            keys,
        });
    }

    /// Dispatch one event to every active module subscribed to its
    /// (direction, kind). Unsubscribed and inactive modules are
    /// skipped silently.
    pub fn dispatch(&mut self, event: &CombatEvent, ctx: &ModuleContext<'_>) {
        let key = (event.direction, event.kind);
        for slot in &mut self.slots {
            if slot.active && slot.keys.contains(&key) {
                slot.module.on_event(event, ctx);
            }
        }
    }

    /// Typed read-back of a registered module, active or not.
    pub fn get<M: AnalysisModule + 'static>(&self) -> Option<&M> {
        self.slots
            .iter()
            .find_map(|slot| slot.module.as_any().downcast_ref::<M>())
    }

    /// Mutable typed access, for post-stream resolution paths.
    pub fn get_mut<M: AnalysisModule + 'static>(&mut self) -> Option<&mut M> {
        self.slots
            .iter_mut()
            .find_map(|slot| slot.module.as_any_mut().downcast_mut::<M>())
    }

    /// Whether a module of this type is registered and passed its
    /// activation precondition.
    pub fn is_active<M: AnalysisModule + 'static>(&self) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.active && slot.module.as_any().downcast_ref::<M>().is_some())
    }

    /// (name, active) for every registered module, in registration order.
    pub fn roster(&self) -> Vec<(&'static str, bool)> {
        self.slots
            .iter()
            .map(|slot| (slot.module.name(), slot.active))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
