//! Config redaction: produce safe-to-log config snapshots by masking sensitive fields.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Keys whose string values are always masked.
static SENSITIVE_KEYS: &[&str] = &[
    "api_key",
    "apiKey",
    "auth_token",
    "authToken",
    "account_sid",
    "private_key",
    "token",
    "secret",
    "password",
];

/// Phone number pattern, optionally carrying a channel prefix like `whatsapp:`.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[a-z]+:)?\+?[0-9]{10,15}$").unwrap());

/// Redact a config JSON value, replacing sensitive strings with a short hint.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn mask(s: &str) -> String {
    if s.chars().count() > 4 {
        format!("{}***", s.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

fn redact_string(s: &str, key: &str) -> Value {
    if s.is_empty() {
        return Value::String(String::new());
    }
    if is_sensitive_key(key) || PHONE_PATTERN.is_match(s) {
        return Value::String(mask(s));
    }
    Value::String(s.to_string())
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}
