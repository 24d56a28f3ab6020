//! reqwest-backed collaborators.
//!
//! Every client takes its base URL explicitly so it can be pointed at a
//! local mock server.

pub mod anthropic;
pub mod github;
pub mod jira;
pub mod okta;
pub mod pagerduty;
pub mod slack;

pub use anthropic::AnthropicGenerator;
pub use github::GithubRepository;
pub use jira::JiraTicketing;
pub use okta::OktaDirectory;
pub use pagerduty::PagerDutyOnCall;
pub use slack::SlackCallback;

use reqwest::header::HeaderValue;
use reqwest::{Response, StatusCode};

/// Header value carrying a credential; excluded from debug output.
pub(crate) fn secret_header(value: &str) -> anyhow::Result<HeaderValue> {
    let mut header = HeaderValue::try_from(value)
        .map_err(|e| anyhow::anyhow!("invalid credential characters: {}", e))?;
    header.set_sensitive(true);
    Ok(header)
}

/// Pass successful responses through; turn anything else into an error with the body.
pub(crate) async fn ensure_success(response: Response, api: &str) -> anyhow::Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::error!(api, status = %status, body = %body, "API error");
    Err(anyhow::anyhow!(
        "{} API error: {} {}\n{}",
        api,
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown"),
        body
    ))
}

pub(crate) fn is_not_found(response: &Response) -> bool {
    response.status() == StatusCode::NOT_FOUND
}

pub(crate) fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
