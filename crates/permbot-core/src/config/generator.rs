//! Code generation endpoint settings.

use serde::{Deserialize, Serialize};

/// Which model endpoint writes the Terraform change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorProvider {
    /// Bedrock `Converse` under the worker's own AWS credentials.
    #[default]
    Bedrock,
    /// Anthropic Messages API with a key from the secret store.
    Anthropic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub provider: GeneratorProvider,

    /// Model id; defaults per provider.
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f32,

    /// Bedrock region (bedrock only); falls back to `aws.region`.
    #[serde(default)]
    pub region: Option<String>,

    /// Messages API endpoint (anthropic only).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Secret store key of the API key (anthropic only).
    #[serde(default)]
    pub api_key_secret: String,
}

pub const DEFAULT_BEDROCK_MODEL: &str = "anthropic.claude-3-5-sonnet-20240620-v1:0";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20240620";

fn default_api_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

impl GeneratorConfig {
    pub fn model_id(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) if !model.trim().is_empty() => model,
            (_, GeneratorProvider::Bedrock) => DEFAULT_BEDROCK_MODEL,
            (_, GeneratorProvider::Anthropic) => DEFAULT_ANTHROPIC_MODEL,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: GeneratorProvider::default(),
            model: None,
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            region: None,
            api_url: default_api_url(),
            api_key_secret: String::new(),
        }
    }
}
