//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SWCACHE_*)
//! 2. TOML config file (if SWCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

mod validation;

pub use validation::ConfigError;

/// The three cache partitions every version owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PartitionKind {
    /// Catch-all for requests that match no other rule.
    General,
    /// Same-origin API responses.
    Api,
    /// Application shell assets seeded at install.
    Static,
}

impl PartitionKind {
    pub const ALL: [PartitionKind; 3] = [PartitionKind::General, PartitionKind::Api, PartitionKind::Static];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionKind::General => "general",
            PartitionKind::Api => "api",
            PartitionKind::Static => "static",
        }
    }
}

impl fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SWCACHE_*)
/// 2. TOML config file (if SWCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployed version token, embedded in every partition name.
    ///
    /// Set via SWCACHE_VERSION environment variable.
    #[serde(default = "default_version")]
    pub version: String,

    /// Prefix shared by all partition names.
    ///
    /// Set via SWCACHE_CACHE_PREFIX environment variable.
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,

    /// Origin the worker is registered for. Manifest paths resolve against it
    /// and only same-origin paths are treated as API calls.
    ///
    /// Set via SWCACHE_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path to SQLite cache database.
    ///
    /// Set via SWCACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for network requests.
    ///
    /// Set via SWCACHE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upper bound on any single network attempt, in milliseconds.
    ///
    /// Set via SWCACHE_NETWORK_TIMEOUT_MS environment variable.
    #[serde(default = "default_network_timeout_ms")]
    pub network_timeout_ms: u64,

    /// Path prefix identifying API calls.
    ///
    /// Set via SWCACHE_API_PREFIX environment variable.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// API routes that always go to the network first.
    ///
    /// Set via SWCACHE_NETWORK_FIRST_ROUTES environment variable.
    #[serde(default = "default_network_first_routes")]
    pub network_first_routes: Vec<String>,

    /// Application shell assets seeded into the static partition at install.
    ///
    /// Set via SWCACHE_STATIC_ASSETS environment variable.
    #[serde(default = "default_static_assets")]
    pub static_assets: Vec<String>,

    /// Page opened when a notification's primary action is clicked.
    ///
    /// Set via SWCACHE_NOTIFICATION_URL environment variable.
    #[serde(default = "default_notification_url")]
    pub notification_url: String,

    /// Icon used for notifications without one.
    ///
    /// Set via SWCACHE_NOTIFICATION_ICON environment variable.
    #[serde(default = "default_notification_icon")]
    pub notification_icon: String,
}

fn default_version() -> String {
    "v1".into()
}

fn default_cache_prefix() -> String {
    "swcache".into()
}

fn default_origin() -> String {
    "http://localhost:3000".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./swcache.sqlite")
}

fn default_user_agent() -> String {
    "swcache/0.1".into()
}

fn default_network_timeout_ms() -> u64 {
    20_000
}

fn default_api_prefix() -> String {
    "/api/".into()
}

fn default_network_first_routes() -> Vec<String> {
    ["/api/auth/login", "/api/auth/logout", "/api/auth/register", "/api/auth/refresh-token"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_static_assets() -> Vec<String> {
    ["/", "/index.html", "/manifest.json", "/favicon.ico", "/favicon.svg", "/icon-192.png", "/icon-512.png"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_notification_url() -> String {
    "/".into()
}

fn default_notification_icon() -> String {
    "/icon-192.png".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            cache_prefix: default_cache_prefix(),
            origin: default_origin(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            network_timeout_ms: default_network_timeout_ms(),
            api_prefix: default_api_prefix(),
            network_first_routes: default_network_first_routes(),
            static_assets: default_static_assets(),
            notification_url: default_notification_url(),
            notification_icon: default_notification_icon(),
        }
    }
}

impl AppConfig {
    /// Network timeout as Duration for use with reqwest/tokio.
    pub fn network_timeout(&self) -> Duration {
        Duration::from_millis(self.network_timeout_ms)
    }

    /// Versioned name of one of this version's partitions.
    pub fn partition_name(&self, kind: PartitionKind) -> String {
        format!("{}-{}-{}", self.cache_prefix, kind, self.version)
    }

    /// Names of the three partitions belonging to the current version.
    pub fn current_partitions(&self) -> Vec<String> {
        PartitionKind::ALL.iter().map(|kind| self.partition_name(*kind)).collect()
    }

    /// The version string reported to page contexts.
    pub fn version_tag(&self) -> String {
        self.partition_name(PartitionKind::General)
    }

    /// Parsed origin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `origin` is not an absolute URL.
    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.origin)
            .map_err(|e| ConfigError::Invalid { field: "origin".into(), reason: e.to_string() })
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SWCACHE_`
    /// 2. TOML file from `SWCACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SWCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SWCACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
