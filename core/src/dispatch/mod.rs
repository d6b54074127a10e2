//! Event dispatch to analysis modules
//!
//! The host owns every module, routes events by an explicit
//! (direction, kind) subscription table, and dispatches strictly in
//! stream order. Which modules run at all is decided once, up front,
//! by activation preconditions; an inactive module stays registered so
//! consumers can tell "off" apart from "zero".

pub mod handler;
pub mod host;


pub use handler::{AnalysisModule, DispatchKey, ModuleContext};
pub use host::{ActivationContext, ModuleHost};
