//! Configuration management for listsync.
//!
//! listsync reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `LISTSYNC_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [schedule]
//! run_interval_seconds = 300
//!
//! [source]
//! base_url = "https://us1.api.mailchimp.com/3.0"
//! api_key = "${LISTSYNC_SOURCE_KEY}"
//! page_size = 900
//! max_concurrency = 9
//!
//! [destination]
//! endpoint = "https://api.ometria.com/v2/push"
//! api_key = "${LISTSYNC_DESTINATION_KEY}"
//!
//! [state]
//! backend = "redis"
//!
//! [state.redis]
//! url = "redis://localhost:6379/0"
//! ```
//!
//! ```rust,no_run
//! use listsync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("listsync.toml")?;
//! println!("Source: {}", config.source.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, DestinationConfig, ListSyncConfig, LoggingConfig, RedisConfig,
    ScheduleConfig, SourceConfig, StateBackend, StateConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
