//! Content resolution for the catch-all route.
//!
//! A request URI is tried against three strategies, in this order:
//!
//! 1. [`StaticFileStrategy`]: a literal file under the static, theme or
//!    content roots
//! 2. [`ArticleStrategy`]: a markdown article, or a category directory
//! 3. [`PageStrategy`]: a standalone markdown page
//!
//! Static files come first so asset URLs are never captured by the markdown
//! strategies; articles come before pages because they are the primary
//! content type.

mod article;
mod page;
mod static_file;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quill_site::{RenderedArticle, Snapshot, find_article, static_candidates, url_segments};

use crate::failover::{Failover, Outcome};
use crate::state::AppState;
use crate::views::View;

pub(crate) use article::ArticleStrategy;
pub(crate) use page::PageStrategy;
pub(crate) use static_file::StaticFileStrategy;

/// What a successful strategy produced.
#[derive(Debug)]
pub(crate) enum Resolved {
    /// A static file, already opened.
    File {
        /// Path of the file (used for the content type).
        path: PathBuf,
        /// Open handle to stream from.
        file: tokio::fs::File,
    },
    /// A rendered HTML view.
    Html(String),
}

/// Everything the strategies need to know about one request.
pub(crate) struct Lookup {
    /// Shared application state.
    pub(crate) state: Arc<AppState>,
    /// Catch-all URI without the leading slash.
    pub(crate) uri: String,
    /// Full request path, as received.
    pub(crate) request_path: String,
    /// Static file candidates, most specific first.
    pub(crate) candidates: Vec<PathBuf>,
    /// Per-request context copy.
    pub(crate) snapshot: Snapshot,
}

impl Lookup {
    /// Prepare the lookup for a request.
    ///
    /// `referrer` is the already-extracted path of the `Referer` header.
    pub(crate) fn new(
        state: Arc<AppState>,
        uri: &str,
        request_path: &str,
        referrer: Option<&str>,
    ) -> Self {
        let site = &state.site;
        let candidates = static_candidates(
            uri,
            referrer,
            &site.files.path,
            &site.theme.path,
            &site.content,
        );
        let snapshot = Snapshot::from_context(&state.context);

        Self {
            uri: uri.to_owned(),
            request_path: request_path.to_owned(),
            candidates,
            snapshot,
            state,
        }
    }

    /// Check whether the URI names anything below a root.
    pub(crate) fn has_segments(&self) -> bool {
        !url_segments(&self.uri).is_empty()
    }
}

/// Render `view`; a template failure fails the attempt.
fn render_view(cx: &Lookup, view: &View) -> Outcome<Resolved> {
    match cx.state.views.render(view) {
        Ok(html) => Outcome::Handled(Resolved::Html(html)),
        Err(e) => Outcome::failed(e),
    }
}

/// Convert a markdown file and show it with the post view.
///
/// The article metadata is looked up by the request URI; pages usually have
/// none.
async fn render_post(cx: &Lookup, path: &Path) -> Outcome<Resolved> {
    let text = match cx.state.renderer.render_file(path).await {
        Ok(text) => text,
        Err(e) => return Outcome::failed(e),
    };
    let meta = find_article(&cx.uri, &cx.state.context.articles).cloned();
    let snapshot = cx
        .snapshot
        .clone()
        .with_article(RenderedArticle { text, meta });

    render_view(cx, &View::Post(snapshot))
}

/// The resolution chain used by the catch-all route.
pub(crate) fn content_failover() -> Failover<Lookup, Resolved> {
    Failover::new()
        .then(StaticFileStrategy)
        .then(ArticleStrategy)
        .then(PageStrategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strategy_order() {
        let names: Vec<_> = content_failover().names().collect();
        assert_eq!(names, vec!["static-file", "article", "page"]);
    }
}
