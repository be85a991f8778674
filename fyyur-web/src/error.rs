//! Error types for fyyur-web
//!
//! Handlers return [`ApiResult`]. Not-found conditions render the 404 page;
//! every other failure is logged and renders the 500 page.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::views::{NotFoundPage, ServerErrorPage};

/// Handler error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Template rendering failed
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Database error outside of fyyur-common queries (transactions)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// fyyur-common error
    #[error("Common error: {0}")]
    Common(fyyur_common::Error),
}

impl From<fyyur_common::Error> for ApiError {
    fn from(err: fyyur_common::Error) -> Self {
        match err {
            fyyur_common::Error::NotFound(what) => ApiError::NotFound(what),
            other => ApiError::Common(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Render an error page, falling back to plain text if the template fails
fn error_page(status: StatusCode, page: askama::Result<String>) -> Response {
    match page {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("Failed to render {} page: {}", status.as_u16(), e);
            (status, status.to_string()).into_response()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::NotFound(what) => {
                tracing::debug!("Not found: {}", what);
                error_page(status, NotFoundPage { messages: Vec::new() }.render())
            }
            other => {
                error!("Request failed: {}", other);
                error_page(status, ServerErrorPage { messages: Vec::new() }.render())
            }
        }
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;
