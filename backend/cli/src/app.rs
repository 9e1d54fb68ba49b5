//! Server wiring: config in, running gateway out.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use intake_channels::TwilioMediaFetcher;
use intake_config::IntakeConfig;
use intake_core::FeedLog;
use intake_extractor::{providers::GeminiProvider, RecordExtractor};
use intake_gateway::{start_server, GatewayState};
use intake_pipeline::IntakePipeline;
use intake_sheets::{SheetsSettings, SheetsSink};
use intake_understanding::{AttachmentExtractor, OcrService};

pub async fn run_server(config: IntakeConfig) -> Result<()> {
    match serde_json::to_value(&config) {
        Ok(value) => info!(config = %intake_config::redact(&value), "Starting intake service"),
        Err(e) => warn!(error = %e, "Failed to render config for logging"),
    }
    if config.gemini.api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; every extraction will degrade to an empty record");
    }
    if let Some(number) = &config.twilio.sender_number {
        info!(number = %intake_logging::redact_sensitive_data(number), "Twilio sender number");
    }

    let addr: SocketAddr = config
        .listen_address()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.listen_address()))?;

    let pipeline = build_pipeline(&config)?;
    start_server(addr, GatewayState::new(Arc::new(pipeline))).await
}

fn build_pipeline(config: &IntakeConfig) -> Result<IntakePipeline> {
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()
        .context("failed to build HTTP client")?;

    let fetcher = TwilioMediaFetcher::new(&config.twilio.account_sid, &config.twilio.auth_token)
        .with_client(client.clone());
    let attachments = AttachmentExtractor::new(Arc::new(fetcher), OcrService::new(&config.ocr.tesseract_bin));

    let provider = GeminiProvider::new(&config.gemini.api_key)
        .with_base_url(&config.gemini.base_url)
        .with_client(client.clone());
    let extractor = RecordExtractor::new(Arc::new(provider), &config.gemini.model);

    let sink = SheetsSink::new(SheetsSettings {
        credentials_path: PathBuf::from(&config.sheets.credentials_path),
        sheet_name: config.sheets.sheet_name.clone(),
        sheet_id: config.sheets.sheet_id.clone(),
    })
    .with_client(client);

    Ok(IntakePipeline::new(
        attachments,
        extractor,
        Arc::new(sink),
        Arc::new(FeedLog::new()),
    ))
}
