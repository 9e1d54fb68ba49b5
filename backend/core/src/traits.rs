use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{FetchError, SinkError};
use crate::record::ContactRecord;

/// Trait for generative-text providers used by the record extractor.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "gemini", "mock").
    fn name(&self) -> &str;

    /// Send a completion request and return the response text.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse>;
}

/// Request to an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    /// Optional system instruction; providers skip it when empty.
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: String::new(),
            user_prompt: user_prompt.into(),
            max_tokens: None,
            temperature: None,
        }
    }
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}

/// Downloads attachment bytes from the messaging platform.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

/// Destination for accepted contact records.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Sink name for logging.
    fn name(&self) -> &str;

    /// Append one record as one row.
    async fn append(&self, record: &ContactRecord) -> Result<(), SinkError>;
}
