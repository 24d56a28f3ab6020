//! Bedrock `Converse` as the code generator.

use anyhow::Context;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, ConverseOutput, InferenceConfiguration, Message, StopReason,
    SystemContentBlock,
};
use permbot_core::config::GeneratorConfig;
use permbot_runtime::CodeGenerator;

pub struct BedrockGenerator {
    client: Client,
    model_id: String,
    max_tokens: u32,
    temperature: f32,
}

impl BedrockGenerator {
    pub fn new(sdk_config: &SdkConfig, config: &GeneratorConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
            model_id: config.model_id().to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl CodeGenerator for BedrockGenerator {
    async fn generate(&self, system: &str, prompt: &str) -> anyhow::Result<String> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .context("invalid converse message")?;
        let inference = InferenceConfiguration::builder()
            .temperature(self.temperature)
            .max_tokens(i32::try_from(self.max_tokens).unwrap_or(i32::MAX))
            .build();

        tracing::debug!(model = %self.model_id, "sending converse request");
        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(system.to_string()))
            .messages(message)
            .inference_config(inference)
            .send()
            .await
            .with_context(|| format!("bedrock:Converse failed for {}", self.model_id))?;

        reply_text(response.stop_reason(), response.output(), self.max_tokens)
    }
}

/// Text of a finished reply. A reply cut off by the token limit is an error.
fn reply_text(
    stop_reason: &StopReason,
    output: Option<&ConverseOutput>,
    max_tokens: u32,
) -> anyhow::Result<String> {
    if *stop_reason == StopReason::MaxTokens {
        anyhow::bail!("generation stopped at the {max_tokens} token limit; output is incomplete");
    }
    let message = output
        .and_then(|o| o.as_message().ok())
        .context("bedrock:Converse returned no message")?;
    Ok(message
        .content()
        .iter()
        .filter_map(|block| block.as_text().ok())
        .map(String::as_str)
        .collect())
}
