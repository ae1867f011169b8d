//! CLI error types.

use quill_config::ConfigError;
use quill_server::ServerError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Site(#[from] ServerError),

    #[error("{0}")]
    Server(String),
}
