//! `quill serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use quill_config::{CliSettings, Config};
use quill_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site root directory (overrides config).
    #[arg(long, env = "QUILL_ROOT")]
    root: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (request and resolution logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            root: self.root,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let site = &config.site_resolved;
        tracing::info!(
            config = ?config.config_path,
            root = %site.root.display(),
            "Loaded configuration"
        );

        output.heading(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.root("root", &site.root);
        output.root("content", &site.content);
        output.root("pages", &site.pages.path);
        output.root("static", &site.files.path);
        output.root("theme", &site.theme.path);
        if !site.context_file.exists() {
            output.warning(&format!(
                "Site context {} not found, no articles will be listed",
                site.context_file.display()
            ));
        }

        let server_config = server_config_from_config(&config, version.to_string());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
