//! Tag listing.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;
use quill_site::Snapshot;

use crate::error::ServerError;
use crate::state::AppState;
use crate::views::View;

/// Handle GET /tag/{tag}.
///
/// Shows the home view with only the articles carrying `tag`. An unknown tag
/// lists nothing.
pub(crate) async fn get_tag(
    Path(tag): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    let snapshot = Snapshot::for_tag(&state.context, &tag);
    tracing::debug!(tag, articles = snapshot.articles.len(), "Filtered by tag");
    Ok(Html(state.views.render(&View::Index(snapshot))?))
}
