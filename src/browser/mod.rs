use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::handoff::PlanOutcome;

/// Open the plan returned by the plan service in the default browser.
///
/// Returns `Ok(false)` when there is nothing to open (a plain acceptance).
///
/// # Errors
/// Returns error if the URL is not http(s) or no browser can be launched
pub fn open_plan(outcome: &PlanOutcome) -> Result<bool> {
    match outcome {
        PlanOutcome::Redirect(url) => {
            ensure_web_url(url)?;
            debug!(url, "opening plan in browser");
            webbrowser::open(url)
                .with_context(|| format!("Failed to open browser for URL: {}", url))?;
            Ok(true)
        }
        PlanOutcome::Accepted => Ok(false),
    }
}

/// Only http(s) links are handed to the OS opener.
fn ensure_web_url(url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(url).with_context(|| format!("Invalid plan URL: {}", url))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("Refusing to open non-web plan URL: {}", url);
    }
    Ok(())
}
