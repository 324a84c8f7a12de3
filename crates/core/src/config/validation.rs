//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn is_name_token(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(char::is_whitespace)
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `version` or `cache_prefix` is empty or contains whitespace
    /// - `origin` is not an absolute http(s) URL
    /// - `network_timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `api_prefix`, a network-first route, or a static asset is not root-relative
    /// - `static_assets` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_name_token(&self.version) {
            return Err(invalid("version", "must be non-empty without whitespace"));
        }
        if !is_name_token(&self.cache_prefix) {
            return Err(invalid("cache_prefix", "must be non-empty without whitespace"));
        }

        let origin = self.origin_url()?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(invalid("origin", format!("unsupported scheme: {}", origin.scheme())));
        }

        if self.network_timeout_ms < 100 {
            return Err(invalid("network_timeout_ms", "must be at least 100ms"));
        }
        if self.network_timeout_ms > 300_000 {
            return Err(invalid("network_timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if !self.api_prefix.starts_with('/') {
            return Err(invalid("api_prefix", "must start with '/'"));
        }
        if let Some(route) = self.network_first_routes.iter().find(|r| !r.starts_with(&self.api_prefix)) {
            return Err(invalid("network_first_routes", format!("{route} is outside {}", self.api_prefix)));
        }

        if self.static_assets.is_empty() {
            return Err(invalid("static_assets", "must list at least one asset"));
        }
        if let Some(asset) = self.static_assets.iter().find(|a| !a.starts_with('/')) {
            return Err(invalid("static_assets", format!("{asset} must start with '/'")));
        }

        if self.static_assets.iter().any(|a| a.starts_with(&self.api_prefix)) {
            tracing::warn!(
                api_prefix = %self.api_prefix,
                "static_assets contains API paths; the API rule takes precedence for them"
            );
        }

        Ok(())
    }
}
