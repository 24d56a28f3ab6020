//! Ticketing (Jira Cloud) settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraConfig {
    /// Site name; the API lives at `https://{organization}.atlassian.net/rest/api/3`.
    #[serde(default)]
    pub organization: String,

    /// Overrides the derived API base URL.
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub project_key: String,

    /// Issue type id.
    #[serde(default)]
    pub issue_type: String,

    /// Secret store key of a JSON document `{"username": ..., "token": ...}`.
    #[serde(default)]
    pub credentials_secret: String,
}

impl JiraConfig {
    pub fn base_url(&self) -> String {
        match &self.api_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.atlassian.net/rest/api/3", self.organization),
        }
    }
}
