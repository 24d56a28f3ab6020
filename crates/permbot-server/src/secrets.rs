use anyhow::Context;
use async_trait::async_trait;
use permbot_runtime::SecretStore;

/// Secrets read from environment variables, for local runs.
///
/// The key `permbot/github-token` is read from `PERMBOT_GITHUB_TOKEN`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretStore;

pub fn env_var_name(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get(&self, key: &str) -> anyhow::Result<String> {
        let name = env_var_name(key);
        std::env::var(&name).with_context(|| format!("secret '{}' not set (expected ${})", key, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_maps_to_upper_snake_case() {
        assert_eq!(env_var_name("permbot/github-token"), "PERMBOT_GITHUB_TOKEN");
        assert_eq!(env_var_name("okta.api_token"), "OKTA_API_TOKEN");
    }

    #[tokio::test]
    async fn unset_variable_is_an_error() {
        let err = EnvSecretStore
            .get("permbot/surely-unset-secret-key")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("PERMBOT_SURELY_UNSET_SECRET_KEY"));
    }
}
