//! Credentialed collaborators built from the secret store on every run.

use anyhow::Context;
use async_trait::async_trait;
use permbot_adapter_http::{
    AnthropicGenerator, GithubRepository, JiraTicketing, OktaDirectory, PagerDutyOnCall,
};
use permbot_core::PermbotConfig;
use permbot_runtime::{CodeGenerator, ConnectorFactory, Connectors, SecretStore};
use serde::Deserialize;
use std::sync::Arc;

/// Jira credentials secret: a JSON document rather than a bare token.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraCredentials {
    pub username: String,
    pub token: String,
}

impl JiraCredentials {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("jira credentials secret is not a {username, token} document")
    }
}

pub struct SecretBackedConnectors {
    secrets: Arc<dyn SecretStore>,
    config: PermbotConfig,
    generator: Option<Arc<dyn CodeGenerator>>,
}

impl SecretBackedConnectors {
    pub fn new(secrets: Arc<dyn SecretStore>, config: PermbotConfig) -> Self {
        Self {
            secrets,
            config,
            generator: None,
        }
    }

    /// Use a generator that needs no secret (Bedrock runs on the worker's role).
    /// Without one, an Anthropic client is built from the API key secret.
    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }
}

#[async_trait]
impl ConnectorFactory for SecretBackedConnectors {
    async fn connect(&self) -> anyhow::Result<Connectors> {
        let cfg = &self.config;
        let okta_token = self.secrets.get(&cfg.directory.token_secret).await?;
        let github_token = self.secrets.get(&cfg.github.token_secret).await?;
        let jira = JiraCredentials::parse(&self.secrets.get(&cfg.jira.credentials_secret).await?)?;
        let pagerduty_token = self.secrets.get(&cfg.pagerduty.token_secret).await?;
        let generator: Arc<dyn CodeGenerator> = match &self.generator {
            Some(generator) => Arc::clone(generator),
            None => {
                let key = self.secrets.get(&cfg.generator.api_key_secret).await?;
                Arc::new(AnthropicGenerator::new(&cfg.generator, key))
            }
        };

        Ok(Connectors {
            directory: Arc::new(OktaDirectory::new(
                cfg.directory.base_url(),
                okta_token,
                cfg.directory.group_prefix.as_str(),
            )),
            repository: Arc::new(GithubRepository::new(
                &cfg.github.api_url,
                cfg.github.owner.as_str(),
                github_token,
            )),
            generator,
            on_call: Arc::new(PagerDutyOnCall::new(&cfg.pagerduty.api_url, pagerduty_token)),
            ticketing: Arc::new(JiraTicketing::new(cfg.jira.base_url(), jira.username, jira.token)),
        })
    }
}
