use std::future::Future;

use tokio::sync::oneshot;

use crate::combat_log::Timestamp;

/// Parameters for an external aggregate query.
///
/// Describes the damage total to request from the report service:
/// events inside the fight window, landing on one target, restricted
/// to spans where the marker buff from the given source was active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateFilter {
    pub start: Timestamp,
    pub end: Timestamp,
    pub target_id: i64,
    pub buff_ability_id: u32,
    pub buff_source_id: i64,
}

/// Why an external fetch produced no total.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request itself was rejected; retrying the same request
    /// will not help.
    #[error("aggregate request rejected with status {status}")]
    Client { status: u16 },
    /// The service failed while handling the request.
    #[error("aggregate service failed with status {status}")]
    Server { status: u16 },
    /// The request never completed.
    #[error("aggregate fetch failed: {reason}")]
    Network { reason: String },
}

pub type FetchOutcome = Result<i64, FetchError>;

/// Source of externally computed aggregate totals.
pub trait AggregateFetcher {
    fn fetch_total(&self, filter: &AggregateFilter) -> impl Future<Output = FetchOutcome> + Send;
}

/// A fetch running out of band, paired with the channel its outcome
/// arrives on.
#[derive(Debug)]
pub struct PendingAggregate {
    rx: oneshot::Receiver<FetchOutcome>,
}

impl PendingAggregate {
    /// Starts the fetch on the runtime and returns a handle to the
    /// eventual outcome.
    pub fn spawn<F>(fetcher: F, filter: AggregateFilter) -> Self
    where
        F: AggregateFetcher + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let outcome = fetcher.fetch_total(&filter).await;
            // The receiver may have been dropped; nothing to do then.
            let _ = tx.send(outcome);
        });
        Self { rx }
    }

    /// Returns the outcome if the fetch has finished, without blocking.
    pub fn try_take(&mut self) -> Option<FetchOutcome> {
        self.rx.try_recv().ok()
    }

    /// Waits for the fetch to finish.
    pub async fn wait(self) -> FetchOutcome {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::Network {
                reason: "aggregate task dropped before completing".into(),
            }),
        }
    }
}
