//! Health check endpoint.
//!
//! Always 200 while the server runs: pages fall back to bundled content
//! when the content service is down, so an unreachable service only
//! degrades the site.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    content_source: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let content_source = state.pages().source_available().await;
    let status = if content_source { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status,
        content_source,
    })
}

/// Create the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
