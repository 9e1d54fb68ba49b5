//! Intake Event Logger
//!
//! Structured per-request events (received, degraded, stored, completed)
//! emitted under the `intake_events` target so they can be filtered into
//! their own NDJSON stream.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntakeEvent {
    Received {
        sender: String,
        has_attachment: bool,
    },
    /// A best-effort stage fell back to its empty result.
    Degraded {
        stage: String,
        error: String,
    },
    SinkFailed {
        sink: String,
        error: String,
    },
    Completed {
        accepted: usize,
        persisted: usize,
        sink_failures: usize,
    },
}

#[derive(Debug, Serialize)]
pub struct IntakeEventEntry {
    pub intake_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: IntakeEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redacts free-text fields and writes the event through `tracing`.
    pub fn log_event(intake_id: Uuid, mut event: IntakeEvent) -> IntakeEventEntry {
        match &mut event {
            IntakeEvent::Received { sender, .. } => {
                *sender = redact_sensitive_data(sender);
            }
            IntakeEvent::Degraded { error, .. } | IntakeEvent::SinkFailed { error, .. } => {
                *error = redact_sensitive_data(error);
            }
            IntakeEvent::Completed { .. } => {}
        }

        let entry = IntakeEventEntry {
            intake_id,
            timestamp: Utc::now(),
            event,
        };

        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "intake_events", event = %json, "Intake event"),
            Err(_) => info!(target: "intake_events", event = ?entry, "Intake event"),
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_is_redacted() {
        let entry = EventLogger::log_event(
            Uuid::new_v4(),
            IntakeEvent::Received {
                sender: "whatsapp:+911234567890".into(),
                has_attachment: false,
            },
        );
        match entry.event {
            IntakeEvent::Received { sender, .. } => assert!(!sender.contains("1234567890")),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn serializes_with_type_tag() {
        let event = IntakeEvent::Completed {
            accepted: 2,
            persisted: 1,
            sink_failures: 1,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "completed");
        assert_eq!(json["persisted"], 1);
    }
}
