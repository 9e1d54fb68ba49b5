use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use intake_core::{LlmProvider, LlmRequest, LlmResponse};

/// Google Gemini provider (Generative Language API, `generateContent`).
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u64>,
}

fn text_content(role: Option<&str>, text: &str) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part {
            text: Some(text.to_string()),
        }],
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let start = Instant::now();

        let system_instruction = (!request.system_prompt.is_empty())
            .then(|| text_content(None, &request.system_prompt));
        let generation_config = (request.max_tokens.is_some() || request.temperature.is_some())
            .then(|| GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            });

        let body = GenerateRequest {
            contents: vec![text_content(Some("user"), &request.user_prompt)],
            system_instruction,
            generation_config,
        };

        debug!(model = %request.model, "Sending request to Gemini");

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini returned {}: {}", status, error_body);
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let content = generated
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        let tokens_used = generated
            .usage_metadata
            .and_then(|u| u.total_token_count)
            .unwrap_or(0);

        Ok(LlmResponse {
            content,
            provider: "gemini".to_string(),
            model: request.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
