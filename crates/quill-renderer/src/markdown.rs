//! Markdown to HTML conversion.

use std::path::{Path, PathBuf};

use pulldown_cmark::{Options, Parser, html};

/// Error returned when a markdown file cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The file could not be read as UTF-8 text.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Source file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The converter failed on the file contents.
    #[error("Failed to convert {}: {message}", path.display())]
    Convert {
        /// Source file.
        path: PathBuf,
        /// Failure description.
        message: String,
    },
}

/// Markdown renderer with GFM extensions.
#[derive(Clone, Copy, Debug)]
pub struct MarkdownRenderer {
    gfm: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { gfm: true }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Convert markdown text to HTML.
    #[must_use]
    pub fn render_str(&self, markdown: &str) -> String {
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, Parser::new_ext(markdown, self.parser_options()));
        output
    }

    /// Read a markdown file and convert it to HTML.
    ///
    /// The file is read asynchronously and converted on a blocking thread.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Read`] if the file is missing, unreadable or not
    /// UTF-8, and [`RenderError::Convert`] if conversion panics.
    pub async fn render_file(&self, path: &Path) -> Result<String, RenderError> {
        let markdown =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| RenderError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let renderer = *self;
        let html = offload(path, move || renderer.render_str(&markdown)).await?;

        tracing::debug!(path = %path.display(), bytes = html.len(), "Rendered markdown");
        Ok(html)
    }
}

/// Run a conversion on the blocking pool, reporting a panic as a convert error.
async fn offload<F>(path: &Path, convert: F) -> Result<String, RenderError>
where
    F: FnOnce() -> String + Send + 'static,
{
    tokio::task::spawn_blocking(convert)
        .await
        .map_err(|e| RenderError::Convert {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
