//! Source repository (GitHub) settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Owner of both Terraform repositories.
    #[serde(default)]
    pub owner: String,

    /// Repository holding per-account environment files.
    #[serde(default)]
    pub environment_repository: String,

    /// Repository holding the SSO module.
    #[serde(default)]
    pub module_repository: String,

    /// Directory of `{group}/{account}.tf` files inside the environment repository.
    #[serde(default)]
    pub environment_sso_account_path: String,

    /// Directory of the SSO module inside the module repository.
    #[serde(default)]
    pub module_sso_path: String,

    #[serde(default = "default_main_branch")]
    pub main_branch: String,

    /// Secret store key of the API token.
    #[serde(default)]
    pub token_secret: String,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_main_branch() -> String {
    "main".to_string()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            owner: String::new(),
            environment_repository: String::new(),
            module_repository: String::new(),
            environment_sso_account_path: String::new(),
            module_sso_path: String::new(),
            main_branch: default_main_branch(),
            token_secret: String::new(),
        }
    }
}

impl GithubConfig {
    /// Environment file for an authorization group and account.
    pub fn environment_file_path(&self, group: &str, account: &str) -> String {
        join_path(&self.environment_sso_account_path, &format!("{}/{}.tf", group, account))
    }

    /// A file of the SSO module, e.g. `main.tf`.
    pub fn module_file_path(&self, file: &str) -> String {
        join_path(&self.module_sso_path, file)
    }
}

fn join_path(base: &str, rest: &str) -> String {
    let base = base.trim_matches('/');
    if base.is_empty() {
        rest.to_string()
    } else {
        format!("{}/{}", base, rest)
    }
}
