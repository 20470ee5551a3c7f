//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{ListSyncConfig, StateBackend};
use super::secret::secret_string;
use crate::domain::errors::SyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`ListSyncConfig`]
/// 4. Applies environment variable overrides (`LISTSYNC_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] if any step fails.
///
/// # Examples
///
/// ```no_run
/// use listsync::config::loader::load_config;
///
/// let config = load_config("listsync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ListSyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ListSyncConfig = toml::from_str(&contents)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        SyncError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(SyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the `LISTSYNC_*` prefix
///
/// Variables follow the pattern `LISTSYNC_<SECTION>_<KEY>`, for example
/// `LISTSYNC_SOURCE_API_KEY` or `LISTSYNC_SCHEDULE_RUN_INTERVAL_SECONDS`.
/// Unparseable numeric values are ignored and left to validation.
fn apply_env_overrides(config: &mut ListSyncConfig) {
    let var = |name: &str| std::env::var(name).ok();

    // Application overrides
    if let Some(val) = var("LISTSYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = var("LISTSYNC_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Schedule overrides
    if let Some(interval) = var("LISTSYNC_SCHEDULE_RUN_INTERVAL_SECONDS").and_then(|v| v.parse().ok()) {
        config.schedule.run_interval_seconds = interval;
    }

    // Source overrides
    if let Some(val) = var("LISTSYNC_SOURCE_BASE_URL") {
        config.source.base_url = val;
    }
    if let Some(val) = var("LISTSYNC_SOURCE_API_KEY") {
        config.source.api_key = secret_string(val);
    }
    if let Some(size) = var("LISTSYNC_SOURCE_PAGE_SIZE").and_then(|v| v.parse().ok()) {
        config.source.page_size = size;
    }
    if let Some(limit) = var("LISTSYNC_SOURCE_MAX_CONCURRENCY").and_then(|v| v.parse().ok()) {
        config.source.max_concurrency = limit;
    }
    if let Some(val) = var("LISTSYNC_SOURCE_LIST_IDS") {
        config.source.list_ids = split_list(&val);
    }

    // Destination overrides
    if let Some(val) = var("LISTSYNC_DESTINATION_ENDPOINT") {
        config.destination.endpoint = val;
    }
    if let Some(val) = var("LISTSYNC_DESTINATION_API_KEY") {
        config.destination.api_key = secret_string(val);
    }

    // State overrides
    if let Some(val) = var("LISTSYNC_STATE_BACKEND") {
        match val.to_lowercase().as_str() {
            "redis" => config.state.backend = StateBackend::Redis,
            "memory" => config.state.backend = StateBackend::Memory,
            other => tracing::warn!(backend = %other, "Ignoring unknown LISTSYNC_STATE_BACKEND"),
        }
    }
    if let Some(val) = var("LISTSYNC_STATE_KEY_PREFIX") {
        config.state.key_prefix = Some(val);
    }
    if let Some(val) = var("LISTSYNC_STATE_REDIS_URL") {
        config.state.redis = Some(super::schema::RedisConfig {
            url: secret_string(val),
        });
    }

    // Logging overrides
    if let Some(val) = var("LISTSYNC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = var("LISTSYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

/// Split a comma-separated list, dropping blank entries
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LISTSYNC_UNIT_TEST_VAR", "test_value");
        let input = "api_key = \"${LISTSYNC_UNIT_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_key = \"test_value\"");
        std::env::remove_var("LISTSYNC_UNIT_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LISTSYNC_UNIT_MISSING_VAR");
        let input = "api_key = \"${LISTSYNC_UNIT_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("LISTSYNC_UNIT_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("LISTSYNC_UNIT_COMMENTED_VAR");
        let input = "# api_key = \"${LISTSYNC_UNIT_COMMENTED_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-listsync.toml");
        assert!(matches!(result, Err(SyncError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[source]
base_url = "https://us1.api.mailchimp.com/3.0"
api_key = "source-key"

[destination]
endpoint = "https://api.ometria.com/v2/push"
api_key = "dest-key"

[state]
backend = "memory"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.source.base_url, "https://us1.api.mailchimp.com/3.0");
        assert_eq!(config.source.page_size, 900);
        assert_eq!(config.source.max_concurrency, 9);
        assert_eq!(config.state.backend, StateBackend::Memory);
    }
}
