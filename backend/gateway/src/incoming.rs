//! Twilio inbound message webhook.

use axum::{extract::State, http::header, response::IntoResponse};
use bytes::Bytes;
use tracing::info;

use intake_channels::{parse_inbound, TwimlReply, TWIML_CONTENT_TYPE};

use crate::server::GatewayState;

/// Handler for `POST /incoming`
///
/// The body is read raw so a malformed form degrades to an empty message
/// instead of a 4xx.
pub async fn incoming(State(state): State<GatewayState>, body: Bytes) -> impl IntoResponse {
    let request = parse_inbound(&body);
    let report = state.pipeline.ingest(&request).await;
    info!(
        intake_id = %report.intake_id,
        persisted = report.persisted,
        "Replying to webhook"
    );

    let reply = TwimlReply::new().message(report.acknowledgement()).render();
    ([(header::CONTENT_TYPE, TWIML_CONTENT_TYPE)], reply)
}
