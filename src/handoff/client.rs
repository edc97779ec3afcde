use std::time::Duration;
use tracing::info;

use super::payload::{interpret_plan_response, InsightsPayload, PlanOutcome};
use crate::transport::{post_json, TransportError};

/// Client for the plan-generation service.
#[derive(Debug, Clone)]
pub struct PlanClient {
    http: reqwest::Client,
    endpoint: String,
    retry_delay: Duration,
}

impl PlanClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, retry_delay: Duration) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            retry_delay,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit a completed result. Non-2xx replies are errors.
    pub async fn submit(&self, payload: &InsightsPayload) -> Result<PlanOutcome, TransportError> {
        let body = post_json(&self.http, &self.endpoint, payload, self.retry_delay).await?;
        let outcome = interpret_plan_response(&body);
        info!(endpoint = %self.endpoint, ?outcome, "plan submitted");
        Ok(outcome)
    }
}
