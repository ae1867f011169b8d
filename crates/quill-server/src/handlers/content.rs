//! Catch-all content route.
//!
//! Runs the resolution chain for any path not claimed by another route and
//! turns its result into a response.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use quill_site::referrer_path;
use tokio_util::io::ReaderStream;

use crate::resolve::{Lookup, Resolved};
use crate::state::AppState;
use crate::views::{NOT_FOUND_HTML, View};

/// Handle GET /{*uri}.
///
/// A path that cannot be decoded (e.g. `/%FF`) names no file or article and
/// gets the 404 page.
pub(crate) async fn get_content(
    uri: Result<Path<String>, PathRejection>,
    State(state): State<Arc<AppState>>,
    request_uri: Uri,
    headers: HeaderMap,
) -> Response {
    let uri = match uri {
        Ok(Path(uri)) => uri,
        Err(rejection) => {
            tracing::warn!(path = request_uri.path(), %rejection, "Undecodable request path");
            return not_found(&state);
        }
    };
    let referrer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(referrer_path);

    let lookup = Lookup::new(
        Arc::clone(&state),
        &uri,
        request_uri.path(),
        referrer.as_deref(),
    );

    match state.failover.run(&lookup).await {
        Ok(resolution) => {
            tracing::debug!(
                path = request_uri.path(),
                strategy = resolution.strategy,
                position = resolution.index,
                "Resolved"
            );
            into_response(resolution.value)
        }
        Err(exhausted) => {
            tracing::warn!(path = request_uri.path(), %exhausted, "Route could not be resolved");
            not_found(&state)
        }
    }
}

/// The 404 response, rendered through the views.
fn not_found(state: &AppState) -> Response {
    let body = state.views.render(&View::NotFound).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to render not-found view");
        NOT_FOUND_HTML.to_owned()
    });
    (StatusCode::NOT_FOUND, Html(body)).into_response()
}

fn into_response(resolved: Resolved) -> Response {
    match resolved {
        Resolved::Html(html) => Html(html).into_response(),
        Resolved::File { path, file } => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            let content_type = HeaderValue::from_str(mime.as_ref())
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
            let body = Body::from_stream(ReaderStream::new(file));
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
    }
}
