pub mod aggregates;
pub mod buffs;
pub mod combat_log;
pub mod config;
pub mod dispatch;
pub mod game_data;
pub mod modules;
pub mod session;

// Re-exports for convenience
pub use aggregates::{
    AggregateFetcher, AggregateFilter, FetchError, FetchOutcome, LazyAggregate, PendingAggregate,
};
pub use buffs::{BuffInterval, BuffKey, BuffTracker};
pub use combat_log::{
    CombatEvent, EventDirection, EventKind, LoadReport, Timestamp, decode_elements, load_events,
};
pub use config::{AnalyzerSettings, CastigationSettings, DevotionAuraSettings, SettingsError};
pub use dispatch::{ActivationContext, AnalysisModule, DispatchKey, ModuleContext, ModuleHost};
pub use modules::{AttributionTotals, Castigation, DevotionAura, MitigationReport};
pub use session::{AnalysisSession, CombatantInfo, Fight, StreamStats};
