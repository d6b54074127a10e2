//! Error types for event stream decoding

use thiserror::Error;

/// Reasons an otherwise well-formed event fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EventFault {
    #[error("negative timestamp {0}")]
    NegativeTimestamp(i64),

    #[error("negative amount {0}")]
    NegativeAmount(i64),

    #[error("negative absorbed value {0}")]
    NegativeAbsorbed(i64),
}

/// Errors during event payload decoding
#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to parse event payload as a JSON array")]
    Payload {
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed event at index {index}")]
    Malformed {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid event at index {index}")]
    Invalid {
        index: usize,
        #[source]
        source: EventFault,
    },
}
