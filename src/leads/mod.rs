//! Lead capture: email check and submission to the lead endpoint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::scoring::Answers;
use crate::transport::{post_json, TransportError};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Loose shape check: something@something.tld with no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("lead endpoint rejected the submission: {0}")]
    Rejected(String),
}

impl LeadError {
    /// True when the failure happened on the wire rather than locally.
    pub fn is_network(&self) -> bool {
        !matches!(self, LeadError::InvalidEmail(_))
    }
}

/// Body POSTed to the lead endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadSubmission {
    pub email: String,
    pub scorecard: String,
    pub answers: BTreeMap<String, u8>,
}

impl LeadSubmission {
    /// Rejects a malformed email before anything touches the network.
    pub fn new(email: &str, scorecard: &str, answers: &Answers) -> Result<Self, LeadError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(LeadError::InvalidEmail(email.to_string()));
        }

        Ok(Self {
            email: email.to_string(),
            scorecard: scorecard.to_string(),
            answers: answers.iter().map(|(id, score)| (id.to_string(), score)).collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadReceipt {
    pub ok: bool,
    #[serde(default)]
    pub lead_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

pub async fn submit_lead(
    http: &reqwest::Client,
    endpoint: &str,
    lead: &LeadSubmission,
    retry_delay: Duration,
) -> Result<LeadReceipt, LeadError> {
    let body = post_json(http, endpoint, lead, retry_delay).await?;
    let receipt = parse_receipt(&body)?;
    info!(lead_id = ?receipt.lead_id, "lead captured");
    Ok(receipt)
}

fn parse_receipt(body: &str) -> Result<LeadReceipt, LeadError> {
    let receipt: LeadReceipt = serde_json::from_str(body)
        .map_err(|e| LeadError::Rejected(format!("unreadable response ({})", e)))?;

    if receipt.ok {
        Ok(receipt)
    } else {
        Err(LeadError::Rejected(
            receipt.error.unwrap_or_else(|| "no reason given".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co.uk"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ana"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana @example.com"));
        assert!(!is_valid_email("ana@@example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_submission_rejects_bad_email_locally() {
        let err = LeadSubmission::new("not-an-email", "marketing-reality-check", &Answers::new()).unwrap_err();
        assert!(matches!(err, LeadError::InvalidEmail(_)));
        assert!(!err.is_network());
    }

    #[test]
    fn test_submission_body() {
        let mut answers = Answers::new();
        answers.record("q1", 4).unwrap();
        answers.record("q2", 2).unwrap();

        let lead = LeadSubmission::new("  ana@example.com ", "hutt-studio-momentum", &answers).unwrap();
        assert_eq!(
            serde_json::to_value(&lead).unwrap(),
            json!({
                "email": "ana@example.com",
                "scorecard": "hutt-studio-momentum",
                "answers": {"q1": 4, "q2": 2}
            })
        );
    }

    #[test]
    fn test_parse_receipt() {
        let receipt = parse_receipt(r#"{"ok": true, "leadId": "abc-123"}"#).unwrap();
        assert_eq!(receipt.lead_id.as_deref(), Some("abc-123"));

        let err = parse_receipt(r#"{"ok": false, "error": "Valid email is required."}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "lead endpoint rejected the submission: Valid email is required."
        );

        assert!(parse_receipt("<html>").is_err());
    }

    #[tokio::test]
    async fn test_submit_lead_returns_receipt() {
        use crate::transport::{build_http_client, test_server::serve};
        use std::sync::atomic::Ordering;

        let (url, hits) = serve(vec![(200, r#"{"ok":true,"leadId":"lead-1"}"#)]).await;
        let http = build_http_client(Duration::from_secs(5)).unwrap();
        let mut answers = Answers::new();
        answers.record("q1", 4).unwrap();
        let lead = LeadSubmission::new("ana@example.com", "marketing-reality-check", &answers).unwrap();

        let receipt = submit_lead(&http, &url, &lead, Duration::from_millis(10)).await.unwrap();
        assert_eq!(receipt.lead_id.as_deref(), Some("lead-1"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_lead_server_refusal() {
        use crate::transport::{build_http_client, test_server::serve};

        let (url, _) = serve(vec![(400, r#"{"ok":false,"error":"Valid email is required."}"#)]).await;
        let http = build_http_client(Duration::from_secs(5)).unwrap();
        let lead = LeadSubmission::new("ana@example.com", "marketing-reality-check", &Answers::new()).unwrap();

        let err = submit_lead(&http, &url, &lead, Duration::from_millis(10)).await.unwrap_err();
        assert!(matches!(
            err,
            LeadError::Transport(TransportError::Status { status: 400, .. })
        ));
        assert!(err.is_network());
    }
}
