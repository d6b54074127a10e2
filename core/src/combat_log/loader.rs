//! Lenient event payload decoding

use serde_json::Value;

use super::{CombatEvent, EventError};

/// What decoding a payload produced: the usable events plus how many
/// elements were dropped on the floor.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Events in payload order
    pub events: Vec<CombatEvent>,
    /// Elements that failed to decode or validate
    pub skipped: usize,
}

/// Decode a JSON array of events.
///
/// The payload itself must be a JSON array; that failing is the only
/// hard error. Individual elements that do not decode or validate are
/// skipped with a warning and counted in the report.
pub fn load_events(payload: &str) -> Result<LoadReport, EventError> {
    let elements: Vec<Value> =
        serde_json::from_str(payload).map_err(|source| EventError::Payload { source })?;
    Ok(decode_elements(elements))
}

/// Decode already-parsed JSON elements (the fixture embedding path).
pub fn decode_elements(elements: Vec<Value>) -> LoadReport {
    let mut report = LoadReport {
        events: Vec::with_capacity(elements.len()),
        skipped: 0,
    };

    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<CombatEvent>(element) {
            Ok(event) => {
                if let Err(source) = event.validate() {
                    let err = EventError::Invalid { index, source };
                    tracing::warn!(error = %err, "dropping event");
                    report.skipped += 1;
                    continue;
                }
                report.events.push(event);
            }
            Err(source) => {
                let err = EventError::Malformed { index, source };
                tracing::warn!(error = %err, "dropping event");
                report.skipped += 1;
            }
        }
    }

    report
}
