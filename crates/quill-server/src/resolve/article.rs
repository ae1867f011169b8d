//! Article and category strategy.

use futures::FutureExt;
use futures::future::BoxFuture;
use quill_site::{ProbeKind, ProbeOptions, SiteError, join_url, resolve_category};

use super::{Lookup, Resolved, render_post, render_view};
use crate::failover::{Outcome, Strategy};
use crate::views::View;

/// Serves `<content>/<uri>.md` as a post, or a content directory as a
/// category listing.
pub(crate) struct ArticleStrategy;

impl Strategy<Lookup, Resolved> for ArticleStrategy {
    fn name(&self) -> &'static str {
        "article"
    }

    fn attempt<'a>(&'a self, cx: &'a Lookup) -> BoxFuture<'a, Outcome<Resolved>> {
        async move {
            // The content root itself is never a category.
            if !cx.has_segments() {
                return Outcome::Declined;
            }

            let site = &cx.state.site;
            let candidates = [join_url(&site.content, &cx.uri)];
            let options = ProbeOptions {
                index: None,
                ext: Some(".md".to_owned()),
                kind: ProbeKind::Any,
            };
            let Some(found) = cx.state.probe.probe(&candidates, &options).await else {
                return Outcome::Declined;
            };

            if found.is_file() {
                return render_post(cx, &found.path).await;
            }

            let context = &cx.state.context;
            match resolve_category(&cx.uri, &context.categories, &context.articles) {
                Ok(category) => {
                    let snapshot = cx.snapshot.clone().with_category(category);
                    render_view(cx, &View::Category(snapshot))
                }
                Err(SiteError::CategoryNotFound(uri)) => {
                    tracing::debug!(uri, "Directory is not a known category");
                    Outcome::Declined
                }
                Err(e) => Outcome::failed(e),
            }
        }
        .boxed()
    }
}
