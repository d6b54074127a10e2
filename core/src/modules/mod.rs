//! Built-in analysis modules
//!
//! Each module consumes the dispatched stream and answers one question
//! about the fight:
//! - [`Castigation`]: damage and healing attributable to the bonus
//!   Penance bolt
//! - [`DevotionAura`]: damage mitigated by the aura, split into the
//!   windows where it was active and everything outside them

pub mod castigation;
pub mod devotion_aura;


pub use castigation::{AttributionTotals, Castigation};
pub use devotion_aura::{DevotionAura, MitigationReport};
