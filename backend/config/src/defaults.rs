//! Default values applied when an environment variable is absent.

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_CREDENTIALS_PATH: &str = "/etc/secrets/google-key.json";
pub const DEFAULT_SHEET_NAME: &str = "candidatedata";

/// Outbound HTTP timeout (media fetch, model call, spreadsheet append).
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_TESSERACT_BIN: &str = "tesseract";
