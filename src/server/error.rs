use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::feed::RenderError;
use crate::reddit::{FetchError, ListingUrlError};

/// Errors that fail a whole feed request.
///
/// Per-post problems never show up here; they only shrink the feed.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Upstream listing unavailable: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to render feed: {0}")]
    Render(#[from] RenderError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Fetch(_) => StatusCode::BAD_GATEWAY,
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Feed request failed");
        (self.status(), self.to_string()).into_response()
    }
}

/// Errors building shared state at startup.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    ListingUrl(#[from] ListingUrlError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub type AppResult<T> = Result<T, AppError>;
