//! Intake Gateway HTTP Server
//!
//! Hosts the Twilio webhook, the live contact feed (SSE), the index page and
//! the health endpoint.

pub mod control_ui;
pub mod feed_stream;
pub mod health_api;
pub mod incoming;
pub mod server;

pub use server::{build_router, start_server, GatewayState};
