use std::any::Any;

use crate::buffs::BuffTracker;
use crate::combat_log::{CombatEvent, EventDirection, EventKind};
use crate::session::Fight;

/// Routing key for subscriptions: which direction and kind a module
/// wants delivered.
pub type DispatchKey = (EventDirection, EventKind);

/// Read-only fight-wide state handed to every module during dispatch.
///
/// The buff tracker is the only cross-module service; everything else
/// a module computes lives in its own state.
pub struct ModuleContext<'a> {
    pub fight: &'a Fight,
    pub buffs: &'a BuffTracker,
}

/// Trait for analysis passes that react to combat events.
/// Implement this for attribution counters, mitigation windows, etc.
pub trait AnalysisModule {
    /// Stable name for listings and logs.
    fn name(&self) -> &'static str;

    /// The (direction, kind) pairs this module wants. Frozen into the
    /// host's routing table at activation.
    fn subscriptions(&self) -> Vec<DispatchKey>;

    /// Handle a single event with read access to fight-wide context.
    ///
    /// Called only for subscribed keys, in stream order. Side effects
    /// stay inside the module's own state.
    fn on_event(&mut self, event: &CombatEvent, ctx: &ModuleContext<'_>);

    /// Downcast support for typed read-back through the host.
    fn as_any(&self) -> &dyn Any;

    /// Mutable counterpart of [`as_any`](Self::as_any), used for
    /// operations that land after stream processing (fetch outcomes).
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
