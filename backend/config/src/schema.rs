//! Typed configuration schema.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::*;
use crate::env::EnvSource;

/// Root configuration for the intake service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    pub server: ServerConfig,
    pub twilio: TwilioConfig,
    pub gemini: GeminiConfig,
    pub sheets: SheetsConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Log filter used when `RUST_LOG` is not a valid directive
    pub log_level: String,
    /// Directory for the rolling JSON log; console only when unset
    pub log_dir: Option<String>,
    /// Timeout for every outbound HTTP call
    pub http_timeout_secs: u64,
}

/// Messaging platform credentials. Used for authenticated media downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number replies go out from (e.g. `whatsapp:+14155238886`).
    pub sender_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Path to the service-account JSON key
    pub credentials_path: String,
    /// Spreadsheet title, resolved through Drive on first append
    pub sheet_name: String,
    /// Spreadsheet ID; skips the Drive lookup when set
    pub sheet_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    pub tesseract_bin: String,
}

impl IntakeConfig {
    /// Read configuration from the process environment.
    ///
    /// Missing credentials are not an error here; calls that need them fail
    /// when they are first made.
    pub fn from_env() -> Self {
        Self::from_source(&EnvSource::Process)
    }

    pub fn from_source(env: &EnvSource) -> Self {
        Self {
            server: ServerConfig {
                bind_address: env.get_or("INTAKE_BIND", DEFAULT_BIND_ADDRESS),
                port: env.parse_or("INTAKE_PORT", DEFAULT_PORT),
                log_level: env.get_or("RUST_LOG", DEFAULT_LOG_LEVEL),
                log_dir: env.get("INTAKE_LOG_DIR"),
                http_timeout_secs: env.parse_or("INTAKE_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
            },
            twilio: TwilioConfig {
                account_sid: env.get_or("TWILIO_ACCOUNT_SID", ""),
                auth_token: env.get_or("TWILIO_AUTH_TOKEN", ""),
                sender_number: env.get("TWILIO_WHATSAPP_NUMBER"),
            },
            gemini: GeminiConfig {
                api_key: env.get_or("GEMINI_API_KEY", ""),
                model: env.get_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                base_url: env.get_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            },
            sheets: SheetsConfig {
                credentials_path: env.get_or("GOOGLE_CREDENTIALS_PATH", DEFAULT_CREDENTIALS_PATH),
                sheet_name: env.get_or("INTAKE_SHEET_NAME", DEFAULT_SHEET_NAME),
                sheet_id: env.get("INTAKE_SHEET_ID"),
            },
            ocr: OcrConfig {
                tesseract_bin: env.get_or("TESSERACT_BIN", DEFAULT_TESSERACT_BIN),
            },
        }
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.server.http_timeout_secs)
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self::from_source(&EnvSource::Map(Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = IntakeConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.listen_address(), "0.0.0.0:5000");
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.sheets.sheet_name, "candidatedata");
        assert_eq!(config.sheets.credentials_path, "/etc/secrets/google-key.json");
        assert!(config.sheets.sheet_id.is_none());
        assert!(config.twilio.account_sid.is_empty());
        assert_eq!(config.http_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn reads_overrides() {
        let env = EnvSource::from_pairs([
            ("INTAKE_PORT", "8088"),
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "tok"),
            ("GEMINI_API_KEY", "AIzaSecret"),
            ("INTAKE_SHEET_ID", "1AbC"),
            ("TESSERACT_BIN", "/opt/tesseract"),
        ]);
        let config = IntakeConfig::from_source(&env);
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.twilio.account_sid, "AC123");
        assert_eq!(config.gemini.api_key, "AIzaSecret");
        assert_eq!(config.sheets.sheet_id.as_deref(), Some("1AbC"));
        assert_eq!(config.ocr.tesseract_bin, "/opt/tesseract");
    }
}
