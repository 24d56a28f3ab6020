use anyhow::Context;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_secretsmanager::Client;
use permbot_runtime::SecretStore;

/// Secret values stored as plain strings in AWS Secrets Manager.
pub struct SecretsManagerStore {
    client: Client,
}

impl SecretsManagerStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn get(&self, key: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get_secret_value()
            .secret_id(key)
            .send()
            .await
            .with_context(|| format!("secretsmanager:GetSecretValue failed for '{}'", key))?;
        response
            .secret_string()
            .map(str::to_string)
            .with_context(|| format!("secret '{}' has no string value", key))
    }
}
