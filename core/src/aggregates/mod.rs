//! External aggregate reconciliation
//!
//! Some totals cannot be derived from the local stream alone; the
//! report service can compute them with filters the stream does not
//! carry. This module owns that seam:
//! - **Fetch surface**: a transport-agnostic async trait plus the
//!   filter describing what to sum
//! - **Accumulator**: merges the incremental local partial with the
//!   authoritative external total, override-never-sum
//! - **Pending fetch**: runs the request out of band so stream
//!   processing never blocks on it

mod accumulator;
mod fetch;

#[cfg(test)]
mod fetch_tests;

pub use accumulator::LazyAggregate;
pub use fetch::{AggregateFetcher, AggregateFilter, FetchError, FetchOutcome, PendingAggregate};
