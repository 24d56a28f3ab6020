//! Slack `response_url` delayed responses.

use crate::ensure_success;
use async_trait::async_trait;
use permbot_runtime::ChatCallback;
use reqwest::Client;
use serde_json::json;

#[derive(Default)]
pub struct SlackCallback {
    http: Client,
}

impl SlackCallback {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatCallback for SlackCallback {
    async fn post(&self, url: &str, text: &str) -> anyhow::Result<()> {
        let response = self.http.post(url).json(&json!({ "text": text })).send().await?;
        ensure_success(response, "Slack").await?;
        Ok(())
    }
}
