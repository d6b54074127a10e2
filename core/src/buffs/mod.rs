//! Buff interval tracking
//!
//! This module provides:
//! - **Intervals**: half-open `[start, end)` spans of buff activity,
//!   one list per (buff, source, target) instance
//! - **Tracker**: consumes boundary events in stream order and answers
//!   point-in-time membership queries
//!
//! The tracker is the only state shared across analysis modules, and
//! it is handed out read-only during dispatch.

mod interval;
pub mod tracker;


pub use interval::{BuffInterval, BuffKey};
pub use tracker::BuffTracker;
