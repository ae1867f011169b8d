//! `quill resolve` command implementation.

use std::path::PathBuf;

use clap::Args;
use quill_config::Config;
use quill_server::{ResolveReport, resolve_uri};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Request path to resolve (e.g. `/blog/post-x`).
    uri: String,

    /// Referer header to resolve with (e.g. `http://localhost:4000/blog/post-x/`).
    #[arg(long)]
    referrer: Option<String>,

    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or the site fails to load.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        tracing::debug!(uri = %self.uri, referrer = ?self.referrer, "Resolving offline");

        let report = resolve_uri(
            config.site_resolved,
            &self.uri,
            self.referrer.as_deref(),
        )
        .await?;

        match describe(&self.uri, &report) {
            Ok(line) => output.resolved(&line),
            Err(line) => output.warning(&line),
        }
        Ok(())
    }
}

/// One-line summary of a report; `Err` when the URI would 404.
fn describe(uri: &str, report: &ResolveReport) -> Result<String, String> {
    match report {
        ResolveReport::File { strategy, path } => {
            Ok(format!("{uri} -> {strategy}: {}", path.display()))
        }
        ResolveReport::Html { strategy, bytes } => {
            Ok(format!("{uri} -> {strategy}: rendered view ({bytes} bytes)"))
        }
        ResolveReport::NotFound { attempts } => Err(format!(
            "{uri} -> 404 (all {attempts} strategies declined)"
        )),
    }
}
