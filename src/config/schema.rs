//! Configuration schema types
//!
//! This module defines the configuration structure for listsync.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

/// Largest page size the source API accepts
pub const MAX_PAGE_SIZE: usize = 1000;

/// Documented per-key ceiling of concurrent requests on the source API
pub const SOURCE_CONCURRENCY_CEILING: usize = 10;

/// Main listsync configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSyncConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Sweep scheduling
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Source CRM API
    pub source: SourceConfig,

    /// Destination marketing-data API
    pub destination: DestinationConfig,

    /// Watermark store
    #[serde(default)]
    pub state: StateConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ListSyncConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.schedule.validate()?;
        self.source.validate()?;
        self.destination.validate()?;
        self.state.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode: fetch and transform, but never push or commit watermarks
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Sweep scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between the start of two sweeps
    #[serde(default = "default_run_interval_seconds")]
    pub run_interval_seconds: u64,
}

impl ScheduleConfig {
    fn validate(&self) -> Result<(), String> {
        if self.run_interval_seconds == 0 {
            return Err("schedule.run_interval_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            run_interval_seconds: default_run_interval_seconds(),
        }
    }
}

/// Source CRM API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// API base URL, e.g. `https://us1.api.mailchimp.com/3.0`
    pub base_url: String,

    /// API key, sent as the basic-auth password
    pub api_key: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Members per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Maximum concurrent page fetch/push tasks per collection
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Only sync these list IDs (empty = every list)
    #[serde(default)]
    pub list_ids: Vec<String>,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        validate_http_url("source.base_url", &self.base_url)?;

        if self.api_key.expose_secret().is_empty() {
            return Err("source.api_key cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("source.timeout_seconds must be > 0".to_string());
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!(
                "source.page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            ));
        }

        if self.max_concurrency == 0 || self.max_concurrency >= SOURCE_CONCURRENCY_CEILING {
            return Err(format!(
                "source.max_concurrency must be between 1 and {}, got {}",
                SOURCE_CONCURRENCY_CEILING - 1,
                self.max_concurrency
            ));
        }

        if let Some(bad) = self.list_ids.iter().find(|id| id.trim().is_empty()) {
            return Err(format!("source.list_ids contains an empty id: {bad:?}"));
        }

        Ok(())
    }
}

/// Destination marketing-data API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Contact import endpoint URL
    pub endpoint: String,

    /// API key, sent in the `Authorization` header
    pub api_key: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl DestinationConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        validate_http_url("destination.endpoint", &self.endpoint)?;

        if self.api_key.expose_secret().is_empty() {
            return Err("destination.api_key cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("destination.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

/// Watermark store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StateBackend {
    /// Redis server
    #[default]
    Redis,
    /// Process memory; watermarks are lost on exit
    Memory,
}

/// Watermark store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StateConfig {
    /// Store backend
    #[serde(default)]
    pub backend: StateBackend,

    /// Optional prefix for watermark keys, joined with `:`
    #[serde(default)]
    pub key_prefix: Option<String>,

    /// Redis settings (required if backend = redis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis: Option<RedisConfig>,
}

impl StateConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(prefix) = &self.key_prefix {
            if prefix.contains(char::is_whitespace) {
                return Err("state.key_prefix must not contain whitespace".to_string());
            }
        }

        match self.backend {
            StateBackend::Redis => match &self.redis {
                Some(redis) => redis.validate(),
                None => Err(
                    "state.redis configuration is required when state.backend = 'redis'"
                        .to_string(),
                ),
            },
            StateBackend::Memory => Ok(()),
        }
    }
}

/// Redis connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Connection URL, e.g. `redis://:password@localhost:6379/0`
    /// Stored securely in memory since it may carry a password
    pub url: SecretString,
}

impl RedisConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        let url = self.url.expose_secret();
        if !url.starts_with("redis://") && !url.starts_with("rediss://") {
            return Err("state.redis.url must start with redis:// or rediss://".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{field} cannot be empty"));
    }

    let parsed = Url::parse(value).map_err(|e| format!("{field} is not a valid URL: {e}"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(format!("{field} must start with http:// or https://"));
    }
    Ok(())
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_run_interval_seconds() -> u64 {
    300
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_page_size() -> usize {
    900
}

fn default_max_concurrency() -> usize {
    SOURCE_CONCURRENCY_CEILING - 1
}

fn default_local_path() -> String {
    "/var/log/listsync".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
