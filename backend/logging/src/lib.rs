//! Structured logging for the intake service.
//!
//! Handles subscriber setup, redaction of contact data and credentials, and
//! the per-request intake event log.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogger, IntakeEvent, IntakeEventEntry};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
