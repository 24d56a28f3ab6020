//! Asynchronous hand-off to a worker Lambda function.

use anyhow::Context;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_lambda::Client;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use permbot_core::SlashCommandEvent;
use permbot_runtime::AsyncDispatch;

pub struct LambdaDispatch {
    client: Client,
    function_name: String,
}

impl LambdaDispatch {
    pub fn new(config: &SdkConfig, function_name: impl Into<String>) -> Self {
        Self {
            client: Client::new(config),
            function_name: function_name.into(),
        }
    }
}

#[async_trait]
impl AsyncDispatch for LambdaDispatch {
    async fn dispatch(&self, event: &SlashCommandEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(event)?;
        let response = self
            .client
            .invoke()
            .function_name(&self.function_name)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(payload))
            .send()
            .await
            .with_context(|| format!("lambda:Invoke failed for {}", self.function_name))?;

        // Event invocations are accepted with 202.
        if response.status_code() != 202 {
            anyhow::bail!(
                "lambda:Invoke for {} returned status {}",
                self.function_name,
                response.status_code()
            );
        }
        tracing::debug!(function = %self.function_name, "event dispatched");
        Ok(())
    }
}
