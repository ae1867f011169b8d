//! Home page.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use quill_site::Snapshot;

use crate::error::ServerError;
use crate::state::AppState;
use crate::views::View;

/// Handle GET /.
pub(crate) async fn get_index(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    let snapshot = Snapshot::from_context(&state.context);
    Ok(Html(state.views.render(&View::Index(snapshot))?))
}
