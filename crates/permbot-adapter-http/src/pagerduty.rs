//! PagerDuty REST API as the on-call directory.

use crate::{ensure_success, secret_header, trim_base};
use async_trait::async_trait;
use permbot_runtime::OnCallDirectory;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

pub struct PagerDutyOnCall {
    http: Client,
    api_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct OnCallsResponse {
    oncalls: Vec<OnCall>,
}

#[derive(Debug, Deserialize)]
struct OnCall {
    user: UserRef,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    user: User,
}

#[derive(Debug, Deserialize)]
struct User {
    email: Option<String>,
}

impl PagerDutyOnCall {
    pub fn new(api_url: impl AsRef<str>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: trim_base(api_url.as_ref()),
            token: token.into(),
        }
    }

    fn get(&self, path: &str) -> anyhow::Result<RequestBuilder> {
        Ok(self
            .http
            .get(format!("{}/{}", self.api_url, path))
            .header(ACCEPT, "application/vnd.pagerduty+json;version=2")
            .header(AUTHORIZATION, secret_header(&format!("Token token={}", self.token))?))
    }
}

#[async_trait]
impl OnCallDirectory for PagerDutyOnCall {
    async fn on_call_email(&self, schedule_id: &str) -> anyhow::Result<Option<String>> {
        let response = self
            .get("oncalls")?
            .query(&[("schedule_ids[]", schedule_id), ("limit", "1")])
            .send()
            .await?;
        let body: OnCallsResponse = ensure_success(response, "PagerDuty").await?.json().await?;
        let Some(on_call) = body.oncalls.into_iter().next() else {
            return Ok(None);
        };

        let response = self.get(&format!("users/{}", on_call.user.id))?.send().await?;
        let body: UserResponse = ensure_success(response, "PagerDuty").await?.json().await?;
        Ok(body.user.email)
    }
}
