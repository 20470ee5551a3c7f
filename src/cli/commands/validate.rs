//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the listsync configuration file.

use crate::config::{load_config, ListSyncConfig, StateBackend};
use crate::core::sync::MAX_CONCURRENCY;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        for line in summary_lines(&config) {
            println!("  {line}");
        }
        println!();
        Ok(0)
    }
}

/// Human-readable settings, without credentials
fn summary_lines(config: &ListSyncConfig) -> Vec<String> {
    let mut lines = vec![
        format!("Log Level: {}", config.application.log_level),
        format!("Dry Run: {}", config.application.dry_run),
        format!("Run Interval: {}s", config.schedule.run_interval_seconds),
        format!("Source API: {}", config.source.base_url),
        format!("Page Size: {}", config.source.page_size),
        format!(
            "Max Concurrency: {} (limit {MAX_CONCURRENCY})",
            config.source.max_concurrency
        ),
        format!(
            "Lists: {}",
            if config.source.list_ids.is_empty() {
                "All".to_string()
            } else {
                format!("{:?}", config.source.list_ids)
            }
        ),
        format!("Destination Endpoint: {}", config.destination.endpoint),
    ];

    match config.state.backend {
        StateBackend::Redis => lines.push("State Backend: redis".to_string()),
        StateBackend::Memory => {
            lines.push("State Backend: memory (watermarks are lost on exit)".to_string())
        }
    }
    if let Some(prefix) = &config.state.key_prefix {
        lines.push(format!("Key Prefix: {prefix}"));
    }
    if config.logging.local_enabled {
        lines.push(format!(
            "Log Files: {} ({})",
            config.logging.local_path, config.logging.local_rotation
        ));
    }

    lines
}
