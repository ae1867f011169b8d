//! Static file strategy.

use futures::FutureExt;
use futures::future::BoxFuture;
use quill_site::{ProbeKind, ProbeOptions};

use super::{Lookup, Resolved};
use crate::failover::{Outcome, Strategy};

/// Serves a literal file from the static, theme or content roots.
///
/// Paths that look like content slugs (no dot anywhere and no trailing
/// slash) are declined before any filesystem access, so an extensionless
/// static file is only served from below a dotted directory.
pub(crate) struct StaticFileStrategy;

/// Check whether a request path can name a static asset.
fn looks_like_asset(request_path: &str) -> bool {
    request_path.contains('.') || request_path.ends_with('/')
}

impl Strategy<Lookup, Resolved> for StaticFileStrategy {
    fn name(&self) -> &'static str {
        "static-file"
    }

    fn attempt<'a>(&'a self, cx: &'a Lookup) -> BoxFuture<'a, Outcome<Resolved>> {
        async move {
            if !looks_like_asset(&cx.request_path) {
                tracing::debug!(path = %cx.request_path, "Not an asset path, skipping probe");
                return Outcome::Declined;
            }

            let options = ProbeOptions {
                index: cx.state.site.files.index.clone(),
                ext: None,
                kind: ProbeKind::File,
            };
            let Some(found) = cx.state.probe.probe(&cx.candidates, &options).await else {
                return Outcome::Declined;
            };

            match tokio::fs::File::open(&found.path).await {
                Ok(file) => Outcome::Handled(Resolved::File {
                    path: found.path,
                    file,
                }),
                Err(e) => {
                    tracing::warn!(path = %found.path.display(), error = %e, "Failed to open static file");
                    Outcome::failed(e)
                }
            }
        }
        .boxed()
    }
}
