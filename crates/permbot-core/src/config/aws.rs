//! AWS account access and secret store settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Region for organization, STS and listing calls. Falls back to the SDK default chain.
    #[serde(default)]
    pub region: Option<String>,

    /// Role assumed in member accounts to list resources.
    #[serde(default = "default_scanning_role")]
    pub scanning_role: String,

    #[serde(default = "default_session_name")]
    pub session_name: String,
}

fn default_scanning_role() -> String {
    "security-scanning".to_string()
}

fn default_session_name() -> String {
    "security-scanning-session".to_string()
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: None,
            scanning_role: default_scanning_role(),
            session_name: default_session_name(),
        }
    }
}

impl AwsConfig {
    pub fn scanning_role_arn(&self, account_id: &str) -> String {
        format!("arn:aws:iam::{}:role/{}", account_id, self.scanning_role)
    }
}

/// Where API tokens are read from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SecretsBackend {
    /// AWS Secrets Manager.
    #[default]
    Aws,
    /// Process environment; the secret key is the variable name.
    Env,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    #[serde(default)]
    pub backend: SecretsBackend,

    /// Secrets Manager region.
    #[serde(default = "default_secrets_region")]
    pub region: String,
}

fn default_secrets_region() -> String {
    "us-west-2".to_string()
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            backend: SecretsBackend::default(),
            region: default_secrets_region(),
        }
    }
}
