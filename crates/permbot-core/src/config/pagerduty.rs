//! On-call schedule (PagerDuty) settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagerDutyConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Schedule whose current on-call person approves grants.
    #[serde(default)]
    pub schedule_id: String,

    /// Secret store key of the API token.
    #[serde(default)]
    pub token_secret: String,
}

fn default_api_url() -> String {
    "https://api.pagerduty.com".to_string()
}

impl Default for PagerDutyConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            schedule_id: String::new(),
            token_secret: String::new(),
        }
    }
}
