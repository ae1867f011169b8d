//! Fixtures shared by the server tests.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quill_config::{ContentRoot, SiteConfig};
use quill_site::{Found, FsProbe, Probe, ProbeOptions, SiteContext};
use tempfile::TempDir;

use crate::resolve::Lookup;
use crate::state::AppState;
use crate::views::{TemplateViews, View, ViewError, ViewRenderer};

/// A site laid out in a temporary directory.
pub(crate) struct Fixture {
    _dir: TempDir,
    pub(crate) site: SiteConfig,
}

impl Fixture {
    /// Create empty `static/`, `theme/`, `content/` and `pages/` roots.
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let site = SiteConfig {
            content: root.join("content"),
            context_file: root.join("content/site.json"),
            files: ContentRoot {
                path: root.join("static"),
                index: Some("index.html".to_owned()),
            },
            theme: ContentRoot {
                path: root.join("theme"),
                index: Some("index.html".to_owned()),
            },
            pages: ContentRoot {
                path: root.join("pages"),
                index: None,
            },
            root,
        };
        for path in [
            &site.content,
            &site.files.path,
            &site.theme.path,
            &site.pages.path,
        ] {
            std::fs::create_dir_all(path).unwrap();
        }
        Self { _dir: dir, site }
    }

    /// Write a file below the site root, creating parent directories.
    pub(crate) fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.site.root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Create a directory below the site root.
    pub(crate) fn mkdir(&self, relative: &str) {
        std::fs::create_dir_all(self.site.root.join(relative)).unwrap();
    }

    /// State with the real filesystem probe.
    pub(crate) fn state(&self, context_json: &str) -> Arc<AppState> {
        self.state_with_probe(context_json, Box::new(FsProbe))
    }

    /// State with a custom probe.
    pub(crate) fn state_with_probe(
        &self,
        context_json: &str,
        probe: Box<dyn Probe>,
    ) -> Arc<AppState> {
        self.state_with(context_json, Box::new(TemplateViews::builtin()), probe)
    }

    /// State with custom views and probe.
    pub(crate) fn state_with(
        &self,
        context_json: &str,
        views: Box<dyn ViewRenderer>,
        probe: Box<dyn Probe>,
    ) -> Arc<AppState> {
        let context = SiteContext::from_json(context_json).unwrap();
        Arc::new(AppState::new(self.site.clone(), context, views, probe))
    }
}

/// Build a lookup the way the catch-all handler does.
pub(crate) fn lookup(state: &Arc<AppState>, request_path: &str, referrer: Option<&str>) -> Lookup {
    let uri = request_path.trim_start_matches('/');
    Lookup::new(Arc::clone(state), uri, request_path, referrer)
}

/// Filesystem probe that counts how often it is asked.
#[derive(Clone, Default)]
pub(crate) struct CountingProbe {
    pub(crate) calls: Arc<AtomicUsize>,
}

impl CountingProbe {
    pub(crate) fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Probe for CountingProbe {
    async fn probe(&self, candidates: &[PathBuf], options: &ProbeOptions) -> Option<Found> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        FsProbe.probe(candidates, options).await
    }
}

/// Views that always fail to render.
pub(crate) struct BrokenViews;

impl ViewRenderer for BrokenViews {
    fn render(&self, _view: &View) -> Result<String, ViewError> {
        Err(ViewError::Template(minijinja::Error::new(
            minijinja::ErrorKind::TemplateNotFound,
            "no templates",
        )))
    }
}
