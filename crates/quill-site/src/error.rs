//! Error types for site lookups and context loading.

use std::path::PathBuf;

/// Error returned by site lookups and context loading.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No category node matches the URI.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    /// Context file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Context file is not valid JSON for [`SiteContext`](crate::SiteContext).
    #[error("Invalid site context: {0}")]
    Parse(#[from] serde_json::Error),
    /// Category tree violates a structural rule.
    #[error("Invalid category tree: {0}")]
    InvalidTree(String),
}
