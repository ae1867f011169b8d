//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use quill_site::SiteError;

use crate::views::ViewError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// View could not be rendered.
    #[error("View error: {0}")]
    View(#[from] ViewError),

    /// Site context could not be loaded.
    #[error("Site error: {0}")]
    Site(#[from] SiteError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>500</h1><h3>Internal server error</h3>"),
        )
            .into_response()
    }
}
