//! Page route handlers.

use axum::extract::{Path, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};

use crate::content::RenderedPage;
use crate::content::model::HOME_SLUG;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Create the page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(front_page))
        .route("/{slug}", get(page))
        .route("/page-data/{slug}", get(page_data))
}

/// The home page.
async fn front_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    render_html(&state, HOME_SLUG).await
}

async fn page(State(state): State<AppState>, Path(slug): Path<String>) -> AppResult<Html<String>> {
    render_html(&state, &slug).await
}

/// The render bundle for a page as JSON: blocks, meta, settings, report.
async fn page_data(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<RenderedPage>> {
    let page = load(&state, &slug).await?;
    Ok(Json(page))
}

async fn render_html(state: &AppState, slug: &str) -> AppResult<Html<String>> {
    let page = load(state, slug).await?;
    let html = state.theme().render_page(&page)?;
    Ok(Html(html))
}

async fn load(state: &AppState, slug: &str) -> AppResult<RenderedPage> {
    if !is_valid_slug(slug) {
        return Err(AppError::PageNotFound(slug.to_string()));
    }
    state
        .pages()
        .render(slug)
        .await
        .ok_or_else(|| AppError::PageNotFound(slug.to_string()))
}

/// Slugs are lowercase ASCII letters, digits, and hyphens.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 128
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}
