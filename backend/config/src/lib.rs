//! `intake-config` — runtime configuration for the contact intake service.
//!
//! Provides:
//! - Typed config schema (server, Twilio, Gemini, Google Sheets, OCR)
//! - Environment loading with optional `.env` file
//! - Config redaction for safe logging/display

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;

pub use env::{load_dotenv, EnvSource};
pub use redact::redact;
pub use schema::{GeminiConfig, IntakeConfig, OcrConfig, ServerConfig, SheetsConfig, TwilioConfig};

/// Load `.env` (if any), then read the config from the process environment.
pub fn load() -> IntakeConfig {
    if let Some(path) = load_dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
    IntakeConfig::from_env()
}
