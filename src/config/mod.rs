mod schema;

pub use schema::{
    Config, DEFAULT_LEAD_ENDPOINT, DEFAULT_PLAN_ENDPOINT, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_RETRY_DELAY,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that overrides `plan_endpoint`
pub const ENV_PLAN_ENDPOINT: &str = "SCORECARD_PLAN_ENDPOINT";

/// Get the config directory path (~/.config/scorecard/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".config").join("scorecard"))
        .unwrap_or_else(|| PathBuf::from(".scorecard"))
}

/// Get the default config file path (~/.config/scorecard/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Directory scanned for extra scorecards when the config does not name one
pub fn get_default_scorecards_dir() -> PathBuf {
    get_config_dir().join("scorecards")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    let mut config = if config_path.exists() {
        read_config(&config_path)?
    } else if explicit {
        anyhow::bail!("Config file not found at {}", config_path.display());
    } else {
        debug!(path = %config_path.display(), "no config file, using defaults");
        Config::default()
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

fn read_config(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(val) = std::env::var(ENV_PLAN_ENDPOINT) {
        let trimmed = val.trim();
        if !trimmed.is_empty() {
            debug!(endpoint = trimmed, "plan endpoint overridden from environment");
            config.plan_endpoint = Some(trimmed.to_string());
        }
    }
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_app_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("plan_endpoint", config.plan_endpoint.as_deref()),
        ("lead_endpoint", config.lead_endpoint.as_deref()),
    ] {
        if let Some(url) = value {
            match reqwest::Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => errors.push(format!(
                    "{}: unsupported scheme '{}' - use http or https",
                    field,
                    parsed.scheme()
                )),
                Err(e) => errors.push(format!("{}: invalid URL '{}' - {}", field, url, e)),
            }
        }
    }

    for (field, value) in [
        ("request_timeout", config.request_timeout.as_deref()),
        ("retry_delay", config.retry_delay.as_deref()),
    ] {
        if let Some(duration) = value {
            if let Err(e) = humantime::parse_duration(duration.trim()) {
                errors.push(format!("{}: invalid duration '{}' - {}", field, duration, e));
            }
        }
    }

    if let Some(ref timeout) = config.request_timeout {
        if let Ok(parsed) = humantime::parse_duration(timeout.trim()) {
            if parsed.is_zero() {
                errors.push("request_timeout: must be greater than zero".to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
