use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tokio_retry::{strategy::FixedInterval, RetryIf};
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("scorecard-engine/", env!("CARGO_PKG_VERSION"));

/// Failure of a single outbound POST.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl TransportError {
    /// Connect errors, timeouts, 5xx and 429 are worth one more try.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Request(e) => e.is_timeout() || e.is_connect(),
            TransportError::Status { status, .. } => is_transient_status(*status),
        }
    }
}

pub fn is_transient_status(status: u16) -> bool {
    status >= 500 || status == 429
}

/// Build the shared HTTP client with a per-request timeout.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, TransportError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// POST `body` as JSON and return the response text of a 2xx reply.
///
/// A transient failure is retried exactly once after `retry_delay`.
pub async fn post_json<T: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    body: &T,
    retry_delay: Duration,
) -> Result<String, TransportError> {
    let retry_strategy = FixedInterval::new(retry_delay).take(1);

    RetryIf::spawn(
        retry_strategy,
        || post_once(client, url, body),
        |e: &TransportError| {
            let transient = e.is_transient();
            if transient {
                warn!(url, error = %e, "transient failure");
            }
            transient
        },
    )
    .await
}

async fn post_once<T: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    body: &T,
) -> Result<String, TransportError> {
    debug!(url, "POST");
    let response = client.post(url).json(body).send().await?;
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        Ok(text)
    } else {
        Err(TransportError::Status {
            status: status.as_u16(),
            body: text,
        })
    }
}
