//! Markdown file rendering for Quill.
//!
//! [`MarkdownRenderer`] reads a markdown file and converts it to HTML with
//! GitHub Flavored Markdown extensions. It is built once at startup and
//! shared by all requests; nothing is cached between calls.
//!
//! # Example
//!
//! ```
//! use quill_renderer::MarkdownRenderer;
//!
//! let renderer = MarkdownRenderer::new();
//! let html = renderer.render_str("# Hello\n\n~~old~~ **new**");
//! assert!(html.contains("<del>old</del>"));
//! ```

mod markdown;

pub use markdown::{MarkdownRenderer, RenderError};
