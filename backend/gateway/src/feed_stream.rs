//! Live contact feed over Server-Sent Events.

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use serde::Deserialize;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::server::GatewayState;

const KEEP_ALIVE: Duration = Duration::from_secs(15);

#[derive(Debug, Default, Deserialize)]
pub struct StreamParams {
    /// Start with the whole backlog instead of only new records.
    #[serde(default)]
    pub replay: Option<String>,
}

impl StreamParams {
    /// `true`, `1`, `yes` and `on` (any case) ask for replay; anything else is live-only.
    pub fn replay(&self) -> bool {
        self.replay.as_deref().is_some_and(|v| {
            matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
        })
    }
}

/// Handler for `GET /stream`
///
/// Each event carries a JSON array of the records appended since the
/// previous event.
pub async fn stream_feed(
    State(state): State<GatewayState>,
    params: Option<Query<StreamParams>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // An unreadable query string falls back to the live-only feed.
    let replay = params.is_some_and(|Query(params)| params.replay());
    let subscription = if replay {
        state.feed.subscribe_from_start().await
    } else {
        state.feed.subscribe().await
    };
    info!(
        watermark = subscription.watermark(),
        replay,
        "Live feed client connected"
    );

    let stream = stream::unfold(subscription, |mut subscription| async move {
        let batch = subscription.next_batch().await?;
        let event = Event::default().json_data(&batch).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to encode feed batch");
            Event::default().comment("encode error")
        });
        Some((Ok(event), subscription))
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE))
}
