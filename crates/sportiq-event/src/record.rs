//! Structured records carried by runtime events.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Milliseconds since the Unix epoch.
///
/// Clock-before-epoch is treated as zero rather than an error; records are
/// diagnostic data, not business state.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A captured error, appended to the runtime core's bounded error log.
///
/// Created by `log_error` and by the global error boundary; the boundary
/// never re-throws, so a record is the only trace a swallowed failure
/// leaves behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Unique record id.
    pub id: Uuid,
    /// Human-readable error message.
    pub message: String,
    /// Where the error originated (layer id, hook name, subsystem).
    pub source: String,
    /// Optional extra context (the stack-trace analogue).
    pub context: Option<String>,
    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

impl ErrorRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(message: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            source: source.into(),
            context: None,
            timestamp_ms: now_millis(),
        }
    }

    /// Attaches extra context to the record.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// A single write to the runtime state map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    /// State key that was written.
    pub key: String,
    /// The value written.
    pub value: Value,
    /// Write time, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

impl StateChange {
    /// Creates a change record stamped with the current time.
    #[must_use]
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
            timestamp_ms: now_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_record_fields() {
        let rec = ErrorRecord::new("boom", "layer:polls").with_context("during init");
        assert_eq!(rec.message, "boom");
        assert_eq!(rec.source, "layer:polls");
        assert_eq!(rec.context.as_deref(), Some("during init"));
        assert!(rec.timestamp_ms > 0);
    }

    #[test]
    fn error_records_have_unique_ids() {
        let a = ErrorRecord::new("x", "s");
        let b = ErrorRecord::new("x", "s");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn state_change_carries_value() {
        let change = StateChange::new("scoreboard:visible", json!(true));
        assert_eq!(change.key, "scoreboard:visible");
        assert_eq!(change.value, json!(true));
    }

    #[test]
    fn now_millis_monotonic_enough() {
        let a = now_millis();
        let b = now_millis();
        assert!(b >= a);
    }
}
