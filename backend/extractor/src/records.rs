//! Contact record extraction.
//!
//! Asks the model for a strict JSON array of `{Name, Email, Phone}` objects
//! and recovers the array from whatever prose the model wraps around it.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use intake_core::{ContactRecord, LlmProvider, LlmRequest};

/// Instruction prepended to the message text.
pub const EXTRACTION_PROMPT: &str = "You are a strict data extractor.\n\
Extract *all* people’s details (Name, Email, Phone number) from the given text.\n\
If there are multiple people, include each one as a separate JSON object.\n\
Return *only* a JSON array like this:\n\
[{\"Name\": \"Alice\", \"Email\": \"alice@example.com\", \"Phone\": \"+911234567890\"},\
{\"Name\": \"Bob\", \"Email\": \"bob@example.com\", \"Phone\": \"9876543210\"}]\n\n";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("extraction request failed: {0:#}")]
    Request(anyhow::Error),

    #[error("no JSON array in model response")]
    NoJsonArray,

    #[error("malformed JSON array: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("model response JSON is not an array")]
    NotAnArray,
}

/// Outcome of a best-effort extraction.
///
/// `records` is never empty: when nothing usable came back it holds a single
/// all-empty record and `error` says why (if something failed).
#[derive(Debug)]
pub struct Extraction {
    pub records: Vec<ContactRecord>,
    pub error: Option<ExtractionError>,
}

impl Extraction {
    fn placeholder(error: Option<ExtractionError>) -> Self {
        Self {
            records: vec![ContactRecord::default()],
            error,
        }
    }
}

pub struct RecordExtractor {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl RecordExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn build_prompt(text: &str) -> String {
        format!("{EXTRACTION_PROMPT}Text:\n{text}")
    }

    /// Call the model and parse its answer. May return an empty list.
    pub async fn extract(&self, text: &str) -> Result<Vec<ContactRecord>, ExtractionError> {
        let request = LlmRequest::new(self.model.clone(), Self::build_prompt(text));
        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(ExtractionError::Request)?;

        debug!(
            provider = %response.provider,
            tokens = response.tokens_used,
            latency_ms = response.latency_ms,
            "Extraction model responded"
        );
        parse_records(&response.content)
    }

    /// Like [`extract`](Self::extract), but never fails and never returns an empty list.
    pub async fn extract_best_effort(&self, text: &str) -> Extraction {
        match self.extract(text).await {
            Ok(records) if records.is_empty() => {
                info!("Model returned an empty array");
                Extraction::placeholder(None)
            }
            Ok(records) => {
                info!(count = records.len(), "Extracted contact records");
                Extraction { records, error: None }
            }
            Err(e) => {
                warn!(error = %e, "Record extraction failed, using empty record");
                Extraction::placeholder(Some(e))
            }
        }
    }
}

/// Parse the first `[` .. last `]` span of a model response into records.
pub fn parse_records(response: &str) -> Result<Vec<ContactRecord>, ExtractionError> {
    let data = response.trim();
    let (Some(start), Some(end)) = (data.find('['), data.rfind(']')) else {
        return Err(ExtractionError::NoJsonArray);
    };
    if end < start {
        return Err(ExtractionError::NoJsonArray);
    }
    let slice = &data[start..=end];

    let value: Value = match serde_json::from_str(slice) {
        Ok(value) => value,
        // Models sometimes answer with Python-style single quotes.
        Err(first) => serde_json::from_str(&slice.replace('\'', "\""))
            .map_err(|_| ExtractionError::Malformed(first))?,
    };

    match value {
        Value::Array(items) => Ok(items.iter().map(record_from_value).collect()),
        _ => Err(ExtractionError::NotAnArray),
    }
}

fn record_from_value(value: &Value) -> ContactRecord {
    ContactRecord {
        name: field(value, "Name"),
        email: field(value, "Email"),
        phone: field(value, "Phone"),
    }
}

/// Trimmed string form of `key`; missing, null, and nested values become empty.
fn field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
