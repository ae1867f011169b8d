//! Standalone page strategy.

use futures::FutureExt;
use futures::future::BoxFuture;
use quill_site::{ProbeKind, ProbeOptions, join_url};

use super::{Lookup, Resolved, render_post};
use crate::failover::{Outcome, Strategy};

/// Serves `<pages>/<uri>.md` with the post view.
pub(crate) struct PageStrategy;

impl Strategy<Lookup, Resolved> for PageStrategy {
    fn name(&self) -> &'static str {
        "page"
    }

    fn attempt<'a>(&'a self, cx: &'a Lookup) -> BoxFuture<'a, Outcome<Resolved>> {
        async move {
            let pages = &cx.state.site.pages;
            let candidates = [join_url(&pages.path, &cx.uri)];
            let options = ProbeOptions {
                index: pages.index.clone(),
                ext: Some(".md".to_owned()),
                kind: ProbeKind::File,
            };

            match cx.state.probe.probe(&candidates, &options).await {
                Some(found) => render_post(cx, &found.path).await,
                None => Outcome::Declined,
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, lookup};

    #[tokio::test]
    async fn test_page_renders_post_view() {
        let fixture = Fixture::new();
        fixture.write("pages/contact.md", "# Contact\n\nWrite to us.");
        let state = fixture.state("{}");

        let outcome = PageStrategy
            .attempt(&lookup(&state, "/contact", None))
            .await;

        let Outcome::Handled(Resolved::Html(body)) = outcome else {
            panic!("page was not rendered");
        };
        assert!(body.contains("<h1>Contact</h1>"), "{body}");
        assert!(body.contains("<p>Write to us.</p>"), "{body}");
    }

    #[tokio::test]
    async fn test_directory_without_index_declines() {
        let fixture = Fixture::new();
        fixture.mkdir("pages/legal");
        let state = fixture.state("{}");

        let outcome = PageStrategy
            .attempt(&lookup(&state, "/legal", None))
            .await;

        assert!(matches!(outcome, Outcome::Declined));
    }

    #[tokio::test]
    async fn test_missing_page_declines() {
        let fixture = Fixture::new();
        let state = fixture.state("{}");

        let outcome = PageStrategy
            .attempt(&lookup(&state, "/nowhere", None))
            .await;

        assert!(matches!(outcome, Outcome::Declined));
    }
}
