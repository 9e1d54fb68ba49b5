//! Index page.
//!
//! The page is compiled into the binary and renders the live feed in a table.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Handler for `GET /`
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
