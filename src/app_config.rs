//! Application configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (prefixed with BLOGBAR_, `__` between sections)
//! 2. Config file (config.toml)
//! 3. Default values
//!
//! The database URL usually carries a password and belongs in the
//! environment (BLOGBAR_DATABASE__URL or DATABASE_URL), not the config file.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Global application configuration
pub static APP_CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| {
    RwLock::new(AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    }))
});

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub description: String,
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Blogbar".to_string(),
            description: "Posts from independent blogs".to_string(),
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL. Empty falls back to the DATABASE_URL variable.
    pub url: String,
    /// Create missing tables at startup (development and SQLite setups)
    pub create_schema: bool,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Moderation queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalsConfig {
    /// Resolved entries per page on the approval results view
    pub page_size: u64,
}

impl Default for ApprovalsConfig {
    fn default() -> Self {
        Self { page_size: 20 }
    }
}

/// Home page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    /// Length of the "latest posts" and "latest blogs" lists
    pub latest_limit: u64,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self { latest_limit: 20 }
    }
}

/// Atom feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub item_limit: u64,
    pub cache_ttl_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            item_limit: 25,
            cache_ttl_secs: 300,
        }
    }
}

/// Static file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory served under `url_prefix`
    pub dir: String,
    pub url_prefix: String,
    /// Append a content hash to static URLs. Disable for tests.
    pub versioned: bool,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            dir: "./static".to_string(),
            url_prefix: "/static".to_string(),
            versioned: true,
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SecurityConfig {
    /// Client addresses that receive 404 for every request
    pub ban_ips: Vec<String>,
    /// Trust X-Forwarded-For / X-Real-IP set by a reverse proxy
    pub behind_proxy: bool,
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub approvals: ApprovalsConfig,
    pub home: HomeConfig,
    pub feed: FeedConfig,
    pub static_files: StaticFilesConfig,
    pub security: SecurityConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        use config::FileFormat;

        let config = Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // e.g. BLOGBAR_SITE__BASE_URL, BLOGBAR_APPROVALS__PAGE_SIZE
            .add_source(
                Environment::with_prefix("BLOGBAR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Database URL, falling back to the DATABASE_URL environment variable
    pub fn database_url(&self) -> Option<String> {
        if self.database.url.is_empty() {
            std::env::var("DATABASE_URL").ok()
        } else {
            Some(self.database.url.clone())
        }
    }
}

/// Initialize application configuration
///
/// Triggers the lazy load and logs the result. Call early in startup.
pub fn init() {
    let config = get_config();
    log::info!("Configuration loaded: site.name = {}", config.site.name);
}

/// Get the current application configuration
pub fn get_config() -> AppConfig {
    APP_CONFIG.read().map(|c| c.clone()).unwrap_or_default()
}

/// Get site configuration
pub fn site() -> SiteConfig {
    get_config().site
}

/// Get moderation queue configuration
pub fn approvals() -> ApprovalsConfig {
    get_config().approvals
}

/// Get home page configuration
pub fn home() -> HomeConfig {
    get_config().home
}

/// Get feed configuration
pub fn feed() -> FeedConfig {
    get_config().feed
}

/// Get static file configuration
pub fn static_files() -> StaticFilesConfig {
    get_config().static_files
}

/// Get security configuration
pub fn security() -> SecurityConfig {
    get_config().security
}
