//! Combat event model and stream decoding
//!
//! Events arrive as an ordered, timestamped array scoped to one fight
//! and one subject player. This module owns the typed event struct,
//! field-level validation, and the lenient JSON decoding used for
//! report payloads (one broken element drops that element, never the
//! payload).

mod error;
mod event;
mod loader;

pub use error::{EventError, EventFault};
pub use event::{CombatEvent, EventDirection, EventKind, Timestamp};
pub use loader::{LoadReport, decode_elements, load_events};
