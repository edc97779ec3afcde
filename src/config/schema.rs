use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PLAN_ENDPOINT: &str = "http://localhost:3000/api/characterx/90-day-plan";
pub const DEFAULT_LEAD_ENDPOINT: &str = "http://localhost:3000/api/leads";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "10s";
pub const DEFAULT_RETRY_DELAY: &str = "500ms";

/// Application configuration.
///
/// Every field is optional; unset fields fall back to the defaults above.
///
/// Example YAML:
/// ```yaml
/// scorecards_dir: /srv/scorecards
/// plan_endpoint: https://plans.example.com/api/characterx/90-day-plan
/// lead_endpoint: https://plans.example.com/api/leads
/// request_timeout: 10s
/// retry_delay: 500ms
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory of extra scorecard YAML files (default: ~/.config/scorecard/scorecards)
    #[serde(default)]
    pub scorecards_dir: Option<PathBuf>,

    /// Plan-generation endpoint that receives completed results
    #[serde(default)]
    pub plan_endpoint: Option<String>,

    /// Lead-capture endpoint
    #[serde(default)]
    pub lead_endpoint: Option<String>,

    /// Per-request timeout, humantime format (e.g. "10s")
    #[serde(default)]
    pub request_timeout: Option<String>,

    /// Pause before the single retry of a transient failure (e.g. "500ms")
    #[serde(default)]
    pub retry_delay: Option<String>,
}

impl Config {
    pub fn plan_endpoint(&self) -> &str {
        self.plan_endpoint.as_deref().unwrap_or(DEFAULT_PLAN_ENDPOINT)
    }

    pub fn lead_endpoint(&self) -> &str {
        self.lead_endpoint.as_deref().unwrap_or(DEFAULT_LEAD_ENDPOINT)
    }

    /// Falls back to the default when unset or unparseable; startup
    /// validation reports unparseable values before this is reached.
    pub fn request_timeout(&self) -> Duration {
        parse_duration_or(self.request_timeout.as_deref(), DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn retry_delay(&self) -> Duration {
        parse_duration_or(self.retry_delay.as_deref(), DEFAULT_RETRY_DELAY)
    }
}

fn parse_duration_or(value: Option<&str>, default: &str) -> Duration {
    value
        .and_then(|v| humantime::parse_duration(v.trim()).ok())
        .or_else(|| humantime::parse_duration(default).ok())
        .unwrap_or_default()
}
