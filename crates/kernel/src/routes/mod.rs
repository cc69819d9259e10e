//! HTTP route handlers.

pub mod front;
pub mod health;
pub mod seo;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application router with its middleware layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(seo::router())
        .merge(health::router())
        .merge(front::router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
