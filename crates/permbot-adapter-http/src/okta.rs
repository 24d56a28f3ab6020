//! Okta users API as the authorization-group directory.

use crate::{ensure_success, is_not_found, secret_header, trim_base};
use async_trait::async_trait;
use permbot_runtime::DirectoryService;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;

pub struct OktaDirectory {
    http: Client,
    base_url: String,
    token: String,
    group_prefix: String,
}

#[derive(Debug, Deserialize)]
struct OktaUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct OktaGroup {
    profile: OktaGroupProfile,
}

#[derive(Debug, Deserialize)]
struct OktaGroupProfile {
    name: String,
}

impl OktaDirectory {
    pub fn new(
        base_url: impl AsRef<str>,
        token: impl Into<String>,
        group_prefix: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: trim_base(base_url.as_ref()),
            token: token.into(),
            group_prefix: group_prefix.into(),
        }
    }

    async fn get(&self, path: &str) -> anyhow::Result<reqwest::Response> {
        let response = self
            .http
            .get(format!("{}/api/v1/{}", self.base_url, path))
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, secret_header(&format!("SSWS {}", self.token))?)
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl DirectoryService for OktaDirectory {
    async fn groups_for_user(&self, email: &str) -> anyhow::Result<Vec<String>> {
        let response = self
            .get(&format!("users/{}", urlencoding::encode(email)))
            .await?;
        if is_not_found(&response) {
            tracing::warn!(email, "user not found in directory");
            return Ok(Vec::new());
        }
        let user: OktaUser = ensure_success(response, "Okta").await?.json().await?;

        let response = self.get(&format!("users/{}/groups", user.id)).await?;
        let groups: Vec<OktaGroup> = ensure_success(response, "Okta").await?.json().await?;

        Ok(groups
            .into_iter()
            .map(|g| g.profile.name)
            .filter(|name| name.starts_with(&self.group_prefix))
            .collect())
    }
}
