//! Identity directory (Okta) settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Okta organization name; the API lives at `https://{organization}.okta.com`.
    #[serde(default)]
    pub organization: String,

    /// Overrides the derived API base URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Email domain appended to chat user names.
    #[serde(default)]
    pub domain: String,

    /// Marker prefix of directory groups that denote AWS permission sets.
    #[serde(default = "default_group_prefix")]
    pub group_prefix: String,

    /// Secret store key of the API token.
    #[serde(default)]
    pub token_secret: String,
}

fn default_group_prefix() -> String {
    "aws_".to_string()
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            organization: String::new(),
            api_url: None,
            domain: String::new(),
            group_prefix: default_group_prefix(),
            token_secret: String::new(),
        }
    }
}

impl DirectoryConfig {
    pub fn base_url(&self) -> String {
        match &self.api_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.okta.com", self.organization),
        }
    }
}
