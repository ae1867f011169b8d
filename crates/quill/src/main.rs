//! Quill CLI - markdown blog server.
//!
//! Provides commands for:
//! - `serve`: Start the blog server
//! - `resolve`: Show which strategy would serve a URI

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ResolveArgs, ServeArgs};
use error::CliError;
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Quill - markdown blog server.
#[derive(Parser)]
#[command(name = "quill", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog server.
    Serve(ServeArgs),
    /// Show how a URI would be resolved, without starting the server.
    Resolve(ResolveArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = tokio::runtime::Runtime::new()
        .map_err(CliError::from)
        .and_then(|rt| match cli.command {
            Commands::Serve(args) => rt.block_on(args.execute(VERSION)),
            Commands::Resolve(args) => rt.block_on(args.execute()),
        });

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
