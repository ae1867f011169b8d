//! Application state.
//!
//! Shared state for all request handlers. Everything here is built once at
//! startup and read-only afterwards.

use quill_config::SiteConfig;
use quill_renderer::MarkdownRenderer;
use quill_site::{FsProbe, Probe, SiteContext};

use crate::error::ServerError;
use crate::failover::Failover;
use crate::resolve::{self, Lookup, Resolved};
use crate::views::{TemplateViews, ViewRenderer};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Resolved site layout.
    pub(crate) site: SiteConfig,
    /// Site-wide content state.
    pub(crate) context: SiteContext,
    /// Markdown to HTML conversion.
    pub(crate) renderer: MarkdownRenderer,
    /// View rendering.
    pub(crate) views: Box<dyn ViewRenderer>,
    /// Filesystem lookups.
    pub(crate) probe: Box<dyn Probe>,
    /// Content resolution chain for the catch-all route.
    pub(crate) failover: Failover<Lookup, Resolved>,
}

impl AppState {
    /// Assemble state from its parts.
    pub(crate) fn new(
        site: SiteConfig,
        context: SiteContext,
        views: Box<dyn ViewRenderer>,
        probe: Box<dyn Probe>,
    ) -> Self {
        Self {
            site,
            context,
            renderer: MarkdownRenderer::new(),
            views,
            probe,
            failover: resolve::content_failover(),
        }
    }

    /// Load the site context and theme templates for `site`.
    ///
    /// A missing context file leaves the site without articles or categories;
    /// static files and pages are still served.
    ///
    /// # Errors
    ///
    /// Returns an error if the context file is invalid or a theme template
    /// fails to load.
    pub(crate) fn load(site: SiteConfig) -> Result<Self, ServerError> {
        let context = if site.context_file.exists() {
            SiteContext::load(&site.context_file)?
        } else {
            tracing::warn!(
                path = %site.context_file.display(),
                "Site context not found, serving without articles"
            );
            SiteContext::default()
        };
        let views = TemplateViews::load(&site.theme.path)?;

        Ok(Self::new(site, context, Box::new(views), Box::new(FsProbe)))
    }
}
