//! HTTP server for the Quill blog engine.
//!
//! Serves three kinds of routes:
//! - `/`: home page listing every article
//! - `/tag/{tag}`: home page listing the articles carrying a tag
//! - `/{*uri}`: anything else, resolved by trying, in order, a static file,
//!   a markdown article or category, and a standalone page
//!
//! Requests no strategy can resolve get a 404 page.
//!
//! # Quick Start
//!
//! ```ignore
//! use quill_config::SiteConfig;
//! use quill_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 4000,
//!         site: SiteConfig::default(),
//!         version: "1.0.0".to_string(),
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (quill-server)
//!                        │
//!                        ├─► index / tag handlers ──► views (minijinja)
//!                        │
//!                        └─► catch-all handler ──► Failover
//!                                                    ├─► static file ──► file stream
//!                                                    ├─► article / category ──► views
//!                                                    └─► page ──► views
//! ```

mod app;
mod error;
mod failover;
mod handlers;
mod middleware;
mod resolve;
mod state;
#[cfg(test)]
mod test_support;
mod views;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use quill_config::SiteConfig;
use quill_site::referrer_path;
use state::AppState;

pub use error::ServerError;
pub use views::ViewError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Site layout.
    pub site: SiteConfig,
    /// Application version.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
            site: SiteConfig::default(),
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the site fails to load or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::load(config.site)?);
    let chain: Vec<_> = state.failover.names().collect();
    tracing::debug!(strategies = ?chain, "Content resolution chain");
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, version = %config.version, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Quill config.
///
/// # Arguments
///
/// * `config` - Quill configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_config(config: &quill_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        site: config.site_resolved.clone(),
        version,
    }
}

/// How a URI would be served.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveReport {
    /// A static file would be streamed.
    File {
        /// Strategy that claimed the URI.
        strategy: &'static str,
        /// File on disk.
        path: PathBuf,
    },
    /// A rendered view would be returned.
    Html {
        /// Strategy that claimed the URI.
        strategy: &'static str,
        /// Size of the rendered document.
        bytes: usize,
    },
    /// Every strategy declined; the server would answer 404.
    NotFound {
        /// Number of strategies tried.
        attempts: usize,
    },
}

/// Resolve a URI the way the catch-all route would, without serving it.
///
/// `uri` is a request path such as `/blog/post-x`; `referrer` is a raw
/// `Referer` header value.
///
/// # Errors
///
/// Returns an error if the site context or theme templates fail to load.
pub async fn resolve_uri(
    site: SiteConfig,
    uri: &str,
    referrer: Option<&str>,
) -> Result<ResolveReport, ServerError> {
    let state = Arc::new(AppState::load(site)?);
    Ok(resolve_with(state, uri, referrer).await)
}

async fn resolve_with(state: Arc<AppState>, uri: &str, referrer: Option<&str>) -> ResolveReport {
    let relative = uri.trim_start_matches('/');
    let request_path = format!("/{relative}");
    let referrer = referrer.and_then(referrer_path);

    let lookup = resolve::Lookup::new(
        Arc::clone(&state),
        relative,
        &request_path,
        referrer.as_deref(),
    );

    match state.failover.run(&lookup).await {
        Ok(resolution) => match resolution.value {
            resolve::Resolved::File { path, .. } => ResolveReport::File {
                strategy: resolution.strategy,
                path,
            },
            resolve::Resolved::Html(html) => ResolveReport::Html {
                strategy: resolution.strategy,
                bytes: html.len(),
            },
        },
        Err(exhausted) => ResolveReport::NotFound {
            attempts: exhausted.attempts,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_resolve_reports_winning_strategy() {
        let fixture = Fixture::new();
        let css = fixture.write("theme/style.css", "body {}");
        fixture.write("pages/contact.md", "# Contact");
        let state = fixture.state("{}");

        let asset = resolve_with(Arc::clone(&state), "/style.css", None).await;
        let page = resolve_with(Arc::clone(&state), "contact", None).await;
        let missing = resolve_with(state, "/missing", None).await;

        assert_eq!(
            asset,
            ResolveReport::File {
                strategy: "static-file",
                path: css,
            }
        );
        assert!(matches!(page, ResolveReport::Html { strategy: "page", .. }));
        assert_eq!(missing, ResolveReport::NotFound { attempts: 3 });
    }

    #[tokio::test]
    async fn test_resolve_uri_loads_site_without_context_file() {
        let fixture = Fixture::new();
        let image = fixture.write("static/blog/post-x/image.png", "png");

        let report = resolve_uri(
            fixture.site.clone(),
            "/image.png",
            Some("http://example.com/blog/post-x/"),
        )
        .await
        .unwrap();

        assert_eq!(
            report,
            ResolveReport::File {
                strategy: "static-file",
                path: image,
            }
        );
    }

    #[test]
    fn test_server_config_from_config() {
        let config = quill_config::Config::default();

        let server = server_config_from_config(&config, "1.2.3".to_owned());

        assert_eq!(server.port, 4000);
        assert_eq!(server.version, "1.2.3");
        assert_eq!(server.site.content, config.site_resolved.content);
    }
}
