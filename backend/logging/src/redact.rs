//! Log Redaction Layer
//!
//! Scrubs API keys, access tokens, email addresses, and phone numbers from
//! strings prior to logging. Contact records are personal data; only their
//! redacted form reaches log output.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").unwrap());
static TELEPHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\-.\s()]{7,}\d").unwrap());
static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(AIza[0-9A-Za-z\-_]{20,})|(ya29\.[0-9A-Za-z\-_.]+)|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)|(key=[0-9A-Za-z\-_]{10,})")
        .unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    // Tokens first: a long key could otherwise be half-eaten by the phone pattern.
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    let redacted = EMAIL_RE.replace_all(&redacted, "[REDACTED_EMAIL]");
    TELEPHONE_RE
        .replace_all(&redacted, "[REDACTED_PHONE]")
        .into_owned()
}
