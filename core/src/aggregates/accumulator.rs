use super::fetch::{FetchError, FetchOutcome};

/// An aggregate that accumulates locally until an authoritative
/// external total replaces it.
///
/// The local partial grows as events stream in. When the external
/// fetch resolves, its total *overrides* the partial; the two are
/// never summed. A failed fetch is recorded so callers can tell
/// "external said zero" apart from "external never answered".
#[derive(Debug, Default)]
pub struct LazyAggregate {
    local: i64,
    external: Option<i64>,
    failure: Option<FetchError>,
}

impl LazyAggregate {
    /// Folds a locally observed amount into the partial total.
    pub fn add_local(&mut self, amount: i64) {
        self.local += amount;
    }

    /// Records the outcome of the external fetch. The first outcome
    /// wins; later calls are ignored and return false.
    pub fn resolve(&mut self, outcome: FetchOutcome) -> bool {
        if self.is_resolved() {
            return false;
        }
        match outcome {
            Ok(total) => self.external = Some(total),
            Err(err) => self.failure = Some(err),
        }
        true
    }

    /// Whether a fetch outcome has been recorded, success or failure.
    pub fn is_resolved(&self) -> bool {
        self.external.is_some() || self.failure.is_some()
    }

    /// Whether an external total is available.
    pub fn has_external(&self) -> bool {
        self.external.is_some()
    }

    /// The best total currently known: the external one when present,
    /// the local partial otherwise.
    pub fn value(&self) -> i64 {
        self.external.unwrap_or(self.local)
    }

    pub fn local(&self) -> i64 {
        self.local
    }

    pub fn external(&self) -> Option<i64> {
        self.external
    }

    pub fn failure(&self) -> Option<&FetchError> {
        self.failure.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_overrides_local_partial() {
        let mut agg = LazyAggregate::default();
        agg.add_local(40);
        agg.add_local(10);
        assert_eq!(agg.value(), 50);

        assert!(agg.resolve(Ok(120)));
        // Overridden, not 170.
        assert_eq!(agg.value(), 120);
        assert_eq!(agg.local(), 50);
    }

    #[test]
    fn first_resolution_wins() {
        let mut agg = LazyAggregate::default();
        assert!(agg.resolve(Ok(7)));
        assert!(!agg.resolve(Ok(999)));
        assert_eq!(agg.value(), 7);

        let mut failed = LazyAggregate::default();
        assert!(failed.resolve(Err(FetchError::Server { status: 503 })));
        assert!(!failed.resolve(Ok(12)));
        assert!(!failed.has_external());
    }

    #[test]
    fn failure_is_not_a_zero_total() {
        let mut agg = LazyAggregate::default();
        agg.add_local(25);
        assert!(agg.resolve(Err(FetchError::Client { status: 401 })));

        assert!(agg.is_resolved());
        assert!(!agg.has_external());
        assert_eq!(agg.value(), 25);
        assert_eq!(agg.failure(), Some(&FetchError::Client { status: 401 }));
    }
}
