//! Configuration types for the permissions bot.
//!
//! All settings live in a single TOML file (`permbot.toml` by default). Every
//! section has serde defaults so a partial file parses; [`PermbotConfig::validate`]
//! then rejects identifiers that have no sensible default.
//!
//! Secrets are never stored here, only the keys under which the secret
//! store holds them.

pub mod aws;
pub mod directory;
pub mod generator;
pub mod github;
pub mod jira;
pub mod pagerduty;
pub mod server;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use aws::{AwsConfig, SecretsBackend, SecretsConfig};
pub use directory::DirectoryConfig;
pub use generator::{GeneratorConfig, GeneratorProvider};
pub use github::GithubConfig;
pub use jira::JiraConfig;
pub use pagerduty::PagerDutyConfig;
pub use server::{ChatConfig, DispatchConfig, DispatchMode, ServerConfig};

/// Environment variable holding the config file path.
pub const CONFIG_ENV: &str = "PERMBOT_CONFIG";

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "permbot.toml";

/// Complete bot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermbotConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    /// Identity directory (authorization groups).
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Terraform repositories and pull requests.
    #[serde(default)]
    pub github: GithubConfig,

    /// Approval tickets.
    #[serde(default)]
    pub jira: JiraConfig,

    /// On-call schedule.
    #[serde(default)]
    pub pagerduty: PagerDutyConfig,

    /// Code generation endpoint.
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub aws: AwsConfig,

    #[serde(default)]
    pub secrets: SecretsConfig,
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required config value: {0}")]
    Missing(&'static str),
}

impl PermbotConfig {
    /// Resolve the config path: explicit argument, then `PERMBOT_CONFIG`, then the default file.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load and validate the config file at `path`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse without validating.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Check that every identifier without a default has been set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&'static str, &str); 13] = [
            ("directory.organization", &self.directory.organization),
            ("directory.domain", &self.directory.domain),
            ("directory.token_secret", &self.directory.token_secret),
            ("github.owner", &self.github.owner),
            ("github.environment_repository", &self.github.environment_repository),
            ("github.module_repository", &self.github.module_repository),
            ("github.token_secret", &self.github.token_secret),
            ("jira.organization", &self.jira.organization),
            ("jira.project_key", &self.jira.project_key),
            ("jira.issue_type", &self.jira.issue_type),
            ("jira.credentials_secret", &self.jira.credentials_secret),
            ("pagerduty.schedule_id", &self.pagerduty.schedule_id),
            ("pagerduty.token_secret", &self.pagerduty.token_secret),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(field));
            }
        }
        if self.generator.provider == GeneratorProvider::Anthropic
            && self.generator.api_key_secret.trim().is_empty()
        {
            return Err(ConfigError::Missing("generator.api_key_secret"));
        }
        if self.dispatch.mode == DispatchMode::Lambda
            && self.dispatch.function_name.as_deref().unwrap_or("").is_empty()
        {
            return Err(ConfigError::Missing("dispatch.function_name"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = r#"
[directory]
organization = "acme"
domain = "acme.io"
token_secret = "okta-token"

[github]
owner = "acme"
environment_repository = "terraform-environments"
module_repository = "terraform-modules"
environment_sso_account_path = "sso/accounts"
module_sso_path = "modules/sso"
token_secret = "github-token"

[jira]
organization = "acme"
project_key = "SEC"
issue_type = "10002"
credentials_secret = "jira-credentials"

[pagerduty]
schedule_id = "PXXXXXX"
token_secret = "pd-token"

[generator]
api_key_secret = "anthropic-key"
"#;

    #[test]
    fn sample_config_parses_and_validates() {
        let cfg = PermbotConfig::from_toml_str(SAMPLE).expect("sample must parse");
        cfg.validate().expect("sample must validate");

        assert_eq!(cfg.server.bind, "0.0.0.0:8080");
        assert_eq!(cfg.chat.bot_name, "AWS Permissions bot");
        assert_eq!(cfg.directory.group_prefix, "aws_");
        assert_eq!(cfg.github.main_branch, "main");
        assert_eq!(cfg.dispatch.mode, DispatchMode::InProcess);
        assert_eq!(cfg.secrets.backend, SecretsBackend::Aws);
    }

    #[test]
    fn missing_identifier_is_reported_by_name() {
        let raw = SAMPLE.replace("project_key = \"SEC\"", "");
        let cfg = PermbotConfig::from_toml_str(&raw).unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("jira.project_key")));
    }

    #[test]
    fn lambda_dispatch_requires_function_name() {
        let raw = format!("{SAMPLE}\n[dispatch]\nmode = \"lambda\"\n");
        let cfg = PermbotConfig::from_toml_str(&raw).unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Missing("dispatch.function_name"))
        ));
    }

    #[test]
    fn bedrock_generator_needs_no_api_key() {
        let raw = SAMPLE.replace("api_key_secret = \"anthropic-key\"", "");
        let cfg = PermbotConfig::from_toml_str(&raw).unwrap();
        assert_eq!(cfg.generator.provider, GeneratorProvider::Bedrock);
        cfg.validate().unwrap();
    }

    #[test]
    fn anthropic_generator_requires_api_key() {
        let raw = SAMPLE.replace(
            "api_key_secret = \"anthropic-key\"",
            "provider = \"anthropic\"",
        );
        let cfg = PermbotConfig::from_toml_str(&raw).unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Missing("generator.api_key_secret"))
        ));
    }

    #[test]
    fn explicit_path_wins() {
        let p = PermbotConfig::resolve_path(Some(Path::new("/etc/permbot.toml")));
        assert_eq!(p, PathBuf::from("/etc/permbot.toml"));
    }
}
