//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use intake_core::FeedLog;
use intake_pipeline::IntakePipeline;

use crate::{control_ui, feed_stream, health_api, incoming};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<IntakePipeline>,
    pub feed: Arc<FeedLog>,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(pipeline: Arc<IntakePipeline>) -> Self {
        let feed = Arc::clone(pipeline.feed());
        Self {
            pipeline,
            feed,
            started_at: Instant::now(),
        }
    }
}

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(control_ui::index))
        .route("/incoming", post(incoming::incoming))
        .route("/stream", get(feed_stream::stream_feed))
        .route("/api/health", get(health_api::get_health))
        // Panics become a 500 instead of a dropped connection.
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the Axum HTTP server and runs until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Gateway HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
