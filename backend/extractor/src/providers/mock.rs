use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use intake_core::{LlmProvider, LlmRequest, LlmResponse};

/// A mock LLM provider that returns canned responses and records prompts.
pub struct MockProvider {
    name: String,
    fixed_response: Option<String>,
    failure: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed_response: None,
            failure: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    /// Make every call fail with `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// User prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, req: &LlmRequest) -> Result<LlmResponse> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(req.user_prompt.clone());
        }
        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }
        Ok(LlmResponse {
            content: self.fixed_response.clone().unwrap_or_else(|| "Mock response".to_string()),
            provider: self.name.clone(),
            model: req.model.clone(),
            tokens_used: 0,
            latency_ms: 0,
        })
    }
}
