//! Jira Cloud REST v3 as the ticketing system.

use crate::{ensure_success, trim_base};
use async_trait::async_trait;
use permbot_core::Ticket;
use permbot_runtime::Ticketing;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{Value, json};

pub struct JiraTicketing {
    http: Client,
    base_url: String,
    username: String,
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraUser {
    account_id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: String,
}

impl JiraTicketing {
    /// `base_url` is the REST root, e.g. `https://acme.atlassian.net/rest/api/3`.
    pub fn new(
        base_url: impl AsRef<str>,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: trim_base(base_url.as_ref()),
            username: username.into(),
            token: token.into(),
        }
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(ACCEPT, "application/json")
            .basic_auth(&self.username, Some(&self.token))
    }
}

#[async_trait]
impl Ticketing for JiraTicketing {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<String>> {
        let response = self
            .authed(self.http.get(format!("{}/user/search", self.base_url)))
            .query(&[("query", email)])
            .send()
            .await?;
        let users: Vec<JiraUser> = ensure_success(response, "Jira").await?.json().await?;
        Ok(users.into_iter().next().map(|u| u.account_id))
    }

    async fn create_issue(&self, ticket: &Ticket) -> anyhow::Result<String> {
        let response = self
            .authed(self.http.post(format!("{}/issue", self.base_url)))
            .json(&issue_payload(ticket))
            .send()
            .await?;
        let created: CreatedIssue = ensure_success(response, "Jira").await?.json().await?;
        Ok(created.key)
    }
}

fn text(value: impl Into<String>) -> Value {
    json!({ "type": "text", "text": value.into() })
}

fn mention(account_id: &str) -> Value {
    json!({ "type": "mention", "attrs": { "id": account_id, "accessLevel": "" } })
}

fn hard_break() -> Value {
    json!({ "type": "hardBreak" })
}

/// Issue creation body with an Atlassian document description.
pub fn issue_payload(ticket: &Ticket) -> Value {
    let paragraph = vec![
        text("Hey "),
        mention(&ticket.assignee_id),
        text(", "),
        mention(&ticket.requester_id),
        text(" requested new permissions for:"),
        hard_break(),
        text(format!("service: {}", ticket.service)),
        hard_break(),
        text(format!("resource: {}", ticket.resource)),
        hard_break(),
        text(format!("permission level: {}", ticket.permission)),
        hard_break(),
        text(format!("account: {}", ticket.account)),
        hard_break(),
        text("Please review and approve - "),
        json!({
            "type": "text",
            "text": "Pull Request",
            "marks": [{
                "type": "link",
                "attrs": { "href": ticket.pull_request_url, "title": "Github Pull Request" }
            }]
        }),
    ];

    json!({
        "fields": {
            "project": { "key": ticket.project_key },
            "issuetype": { "id": ticket.issue_type },
            "summary": ticket.summary,
            "description": {
                "version": 1,
                "type": "doc",
                "content": [{ "type": "paragraph", "content": paragraph }]
            },
            "assignee": { "id": ticket.assignee_id }
        },
        "update": {}
    })
}
