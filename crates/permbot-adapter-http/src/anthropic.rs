//! Anthropic Messages API as the code generator.

use crate::{ensure_success, secret_header};
use async_trait::async_trait;
use permbot_core::config::GeneratorConfig;
use permbot_runtime::CodeGenerator;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicGenerator {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl AnthropicGenerator {
    pub fn new(config: &GeneratorConfig, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: config.api_url.clone(),
            api_key: api_key.into(),
            model: config.model_id().to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl CodeGenerator for AnthropicGenerator {
    async fn generate(&self, system: &str, prompt: &str) -> anyhow::Result<String> {
        if self.api_key.is_empty() {
            anyhow::bail!("generator API key not configured");
        }
        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "system": system,
            "messages": [{ "role": "user", "content": prompt }],
        });

        tracing::debug!(model = %self.model, "sending generation request");
        let response = self
            .http
            .post(&self.api_url)
            .header("x-api-key", secret_header(&self.api_key)?)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;
        let response: ApiResponse = ensure_success(response, "Anthropic").await?.json().await?;

        // The reply replaces the whole environment file, so a cut-off one must not be used.
        if response.stop_reason.as_deref() == Some("max_tokens") {
            anyhow::bail!(
                "generation stopped at the {} token limit; output is incomplete",
                self.max_tokens
            );
        }

        Ok(response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect())
    }
}
