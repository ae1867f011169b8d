//! Configuration management for Quill.
//!
//! Parses `quill.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Content Roots
//!
//! Every content directory is resolved relative to a single site root:
//!
//! - `site.content` - article and category markdown tree
//! - `files.path` - static files
//! - `theme.path` - theme assets and templates
//! - `pages.path` - standalone markdown pages
//!
//! ## Environment Variable Expansion
//!
//! `server.host` supports `${VAR}` and `${VAR:-default}` references.

mod expand;

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override site root directory.
    pub root: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quill.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Site layout (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Static files root.
    files: RootConfigRaw,
    /// Theme root.
    theme: RootConfigRaw,
    /// Standalone pages root.
    pages: RootConfigRaw,

    /// Resolved site layout (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 4000,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    root: Option<String>,
    content: Option<String>,
    context: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RootConfigRaw {
    path: Option<String>,
    index: Option<String>,
}

/// A content directory with an optional index filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentRoot {
    /// Absolute directory path.
    pub path: PathBuf,
    /// File served when a directory is requested (e.g. `index.html`).
    pub index: Option<String>,
}

impl ContentRoot {
    fn new(path: PathBuf, index: Option<&str>) -> Self {
        Self {
            path,
            index: index.map(str::to_owned),
        }
    }
}

/// Resolved site layout with absolute paths.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Site root; every other path lives below it.
    pub root: PathBuf,
    /// Article and category markdown tree.
    pub content: PathBuf,
    /// Prebuilt site context (articles, tags, categories) as JSON.
    pub context_file: PathBuf,
    /// Static files.
    pub files: ContentRoot,
    /// Theme assets and templates.
    pub theme: ContentRoot,
    /// Standalone markdown pages.
    pub pages: ContentRoot,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfigRaw::default().resolve(
            Path::new("."),
            &RootConfigRaw::default(),
            &RootConfigRaw::default(),
            &RootConfigRaw::default(),
        )
    }
}

impl SiteConfigRaw {
    fn resolve(
        &self,
        base: &Path,
        files: &RootConfigRaw,
        theme: &RootConfigRaw,
        pages: &RootConfigRaw,
    ) -> SiteConfig {
        let root = match self.root.as_deref() {
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        };
        let content = root.join(self.content.as_deref().unwrap_or("content"));
        let context_file = root.join(self.context.as_deref().unwrap_or("content/site.json"));

        SiteConfig {
            files: ContentRoot::new(
                root.join(files.path.as_deref().unwrap_or("static")),
                files.index.as_deref().or(Some("index.html")),
            ),
            theme: ContentRoot::new(
                root.join(theme.path.as_deref().unwrap_or("theme")),
                theme.index.as_deref().or(Some("index.html")),
            ),
            pages: ContentRoot::new(
                root.join(pages.path.as_deref().unwrap_or("pages")),
                pages.index.as_deref(),
            ),
            root,
            content,
            context_file,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`QUILL_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Content roots live below the site root: no absolute paths, no `..`.
fn require_inside_root(value: &str, field: &str) -> Result<(), ConfigError> {
    let escapes = Path::new(value).components().any(|c| {
        matches!(
            c,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });
    if escapes {
        return Err(ConfigError::Validation(format!(
            "{field} must be a relative path inside the site root, got {value:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quill.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    ///
    /// A root override re-resolves every content directory below the new root.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(root) = &settings.root {
            self.site.root = None;
            self.site_resolved = self
                .site
                .resolve(root, &self.files, &self.theme, &self.pages);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            server: ServerConfig::default(),
            site: SiteConfigRaw::default(),
            files: RootConfigRaw::default(),
            theme: RootConfigRaw::default(),
            pages: RootConfigRaw::default(),
            site_resolved: SiteConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_site()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate the raw site layout.
    fn validate_site(&self) -> Result<(), ConfigError> {
        let roots = [
            (self.site.content.as_deref(), "site.content"),
            (self.site.context.as_deref(), "site.context"),
            (self.files.path.as_deref(), "files.path"),
            (self.theme.path.as_deref(), "theme.path"),
            (self.pages.path.as_deref(), "pages.path"),
        ];
        for (value, field) in roots {
            if let Some(value) = value {
                require_non_empty(value, field)?;
                require_inside_root(value, field)?;
            }
        }
        for (index, field) in [
            (&self.files.index, "files.index"),
            (&self.theme.index, "theme.index"),
            (&self.pages.index, "pages.index"),
        ] {
            if let Some(index) = index
                && (index.is_empty() || index.contains('/'))
            {
                return Err(ConfigError::Validation(format!(
                    "{field} must be a plain file name"
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.site_resolved = self
            .site
            .resolve(config_dir, &self.files, &self.theme, &self.pages);
    }
}
