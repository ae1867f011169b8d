//! View rendering.
//!
//! Handlers and strategies describe what to show with a [`View`]; a
//! [`ViewRenderer`] turns it into HTML. [`TemplateViews`] is the default
//! renderer, backed by minijinja templates.
//!
//! # Templates
//!
//! | View       | Template        |
//! |------------|-----------------|
//! | `Index`    | `index.html`    |
//! | `Post`     | `post.html`     |
//! | `Category` | `category.html` |
//!
//! Each template receives the request [`Snapshot`] as its context. A theme
//! overrides a template by providing `<theme>/templates/<name>`; all
//! built-in templates extend `layout.html`, which can be overridden the
//! same way.

use std::path::{Path, PathBuf};

use minijinja::Environment;
use quill_site::Snapshot;

/// Body of the not-found response.
pub(crate) const NOT_FOUND_HTML: &str = "<h1>404</h1><h3>File not found</h3>";

/// Built-in templates, overridable by the theme.
const DEFAULT_TEMPLATES: [(&str, &str); 4] = [
    ("layout.html", include_str!("../templates/layout.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("post.html", include_str!("../templates/post.html")),
    ("category.html", include_str!("../templates/category.html")),
];

/// Something to show for a request.
#[derive(Debug)]
pub(crate) enum View {
    /// Article listing (home page or tag page).
    Index(Snapshot),
    /// Single article or standalone page; `snapshot.article` is set.
    Post(Snapshot),
    /// Category listing; `snapshot.category` is set.
    Category(Snapshot),
    /// Nothing matched the request.
    NotFound,
}

/// Error returned when a view cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// Template failed to compile or render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
    /// Theme template could not be read.
    #[error("Failed to read template {}: {source}", path.display())]
    Io {
        /// Template file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Renders views to HTML.
pub(crate) trait ViewRenderer: Send + Sync {
    /// Render `view` to an HTML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the view's template fails to render.
    fn render(&self, view: &View) -> Result<String, ViewError>;
}

/// [`ViewRenderer`] backed by minijinja templates.
pub(crate) struct TemplateViews {
    env: Environment<'static>,
}

impl TemplateViews {
    /// Load templates, preferring `<theme_dir>/templates/<name>` over the
    /// built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a theme template exists but cannot be read or
    /// does not compile.
    pub(crate) fn load(theme_dir: &Path) -> Result<Self, ViewError> {
        let template_dir = theme_dir.join("templates");
        let mut env = Environment::new();

        for (name, default) in DEFAULT_TEMPLATES {
            let path = template_dir.join(name);
            let source = if path.is_file() {
                tracing::debug!(template = name, path = %path.display(), "Using theme template");
                std::fs::read_to_string(&path).map_err(|source| ViewError::Io {
                    path: path.clone(),
                    source,
                })?
            } else {
                default.to_owned()
            };
            env.add_template_owned(name, source)?;
        }

        Ok(Self { env })
    }

    /// Built-in templates only.
    #[cfg(test)]
    pub(crate) fn builtin() -> Self {
        Self::load(Path::new("/nonexistent-theme")).expect("built-in templates compile")
    }
}

impl ViewRenderer for TemplateViews {
    fn render(&self, view: &View) -> Result<String, ViewError> {
        let (name, snapshot) = match view {
            View::Index(snapshot) => ("index.html", snapshot),
            View::Post(snapshot) => ("post.html", snapshot),
            View::Category(snapshot) => ("category.html", snapshot),
            View::NotFound => return Ok(NOT_FOUND_HTML.to_owned()),
        };

        let template = self.env.get_template(name)?;
        Ok(template.render(snapshot)?)
    }
}
