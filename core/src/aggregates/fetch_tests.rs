use std::sync::Arc;

use tokio::sync::Notify;

use super::*;

const FILTER: AggregateFilter = AggregateFilter {
    start: 0,
    end: 100_000,
    target_id: 7,
    buff_ability_id: 211_210,
    buff_source_id: 7,
};

struct ImmediateFetcher {
    outcome: FetchOutcome,
}

impl AggregateFetcher for ImmediateFetcher {
    async fn fetch_total(&self, _filter: &AggregateFilter) -> FetchOutcome {
        self.outcome.clone()
    }
}

/// Blocks until released, so tests can observe the in-flight state.
struct GatedFetcher {
    gate: Arc<Notify>,
    total: i64,
}

impl AggregateFetcher for GatedFetcher {
    async fn fetch_total(&self, _filter: &AggregateFilter) -> FetchOutcome {
        self.gate.notified().await;
        Ok(self.total)
    }
}

struct FilterEcho;

impl AggregateFetcher for FilterEcho {
    async fn fetch_total(&self, filter: &AggregateFilter) -> FetchOutcome {
        Ok(filter.end - filter.start)
    }
}

#[tokio::test]
async fn test_wait_returns_fetched_total() {
    let pending = PendingAggregate::spawn(ImmediateFetcher { outcome: Ok(4_200) }, FILTER);
    assert_eq!(pending.wait().await, Ok(4_200));
}

#[tokio::test]
async fn test_wait_surfaces_fetch_error() {
    let pending = PendingAggregate::spawn(
        ImmediateFetcher {
            outcome: Err(FetchError::Server { status: 502 }),
        },
        FILTER,
    );
    assert_eq!(pending.wait().await, Err(FetchError::Server { status: 502 }));
}

#[tokio::test]
async fn test_try_take_is_none_until_fetch_finishes() {
    let gate = Arc::new(Notify::new());
    let mut pending = PendingAggregate::spawn(
        GatedFetcher {
            gate: Arc::clone(&gate),
            total: 88,
        },
        FILTER,
    );

    assert!(pending.try_take().is_none());

    gate.notify_one();
    let mut taken = None;
    for _ in 0..100 {
        tokio::task::yield_now().await;
        if let Some(outcome) = pending.try_take() {
            taken = Some(outcome);
            break;
        }
    }
    assert_eq!(taken, Some(Ok(88)));
}

#[tokio::test]
async fn test_fetcher_receives_the_filter() {
    let pending = PendingAggregate::spawn(FilterEcho, FILTER);
    assert_eq!(pending.wait().await, Ok(100_000));
}
