//! Errors surfaced by the HTTP handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum AppError {
    /// Neither the content source nor the bundled pages know the slug.
    #[error("no page at '/{0}'")]
    PageNotFound(String),

    /// The page shell failed to render. Details stay in the log.
    #[error("page rendering failed")]
    Render(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::PageNotFound(_) => StatusCode::NOT_FOUND,
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::PageNotFound(slug) => debug!(slug = %slug, "page not found"),
            Self::Render(e) => error!(error = ?e, "page rendering failed"),
        }
        (self.status(), self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
