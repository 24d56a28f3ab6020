//! GitHub REST API as the source repository.

use crate::{ensure_success, is_not_found, secret_header, trim_base};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use permbot_core::FileContent;
use permbot_runtime::{FileUpdate, PullRequestDraft, SourceRepository};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;

const API_VERSION: &str = "2022-11-28";

pub struct GithubRepository {
    http: Client,
    api_url: String,
    owner: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: String,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    object: RefObject,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    html_url: String,
}

impl GithubRepository {
    pub fn new(api_url: impl AsRef<str>, owner: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: trim_base(api_url.as_ref()),
            owner: owner.into(),
            token: token.into(),
        }
    }

    fn request(&self, method: Method, repo: &str, path: &str) -> anyhow::Result<RequestBuilder> {
        let url = format!("{}/repos/{}/{}/{}", self.api_url, self.owner, repo, path);
        Ok(self
            .http
            .request(method, url)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, "permbot")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header(AUTHORIZATION, secret_header(&format!("Bearer {}", self.token))?))
    }
}

/// Contents API payloads are base64 wrapped at 60 columns.
fn decode_content(encoded: &str) -> anyhow::Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}

#[async_trait]
impl SourceRepository for GithubRepository {
    async fn read_file(
        &self,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> anyhow::Result<Option<FileContent>> {
        let mut request = self.request(Method::GET, repo, &format!("contents/{}", path))?;
        if let Some(git_ref) = git_ref {
            request = request.query(&[("ref", git_ref)]);
        }
        let response = request.send().await?;
        if is_not_found(&response) {
            return Ok(None);
        }
        let body: ContentResponse = ensure_success(response, "GitHub").await?.json().await?;
        Ok(Some(FileContent {
            content: decode_content(&body.content)?,
            sha: body.sha,
        }))
    }

    async fn head_commit(&self, repo: &str, branch: &str) -> anyhow::Result<String> {
        let response = self
            .request(Method::GET, repo, &format!("git/ref/heads/{}", branch))?
            .send()
            .await?;
        let body: RefResponse = ensure_success(response, "GitHub").await?.json().await?;
        Ok(body.object.sha)
    }

    async fn create_branch(&self, repo: &str, name: &str, from_sha: &str) -> anyhow::Result<()> {
        let response = self
            .request(Method::POST, repo, "git/refs")?
            .json(&json!({
                "ref": format!("refs/heads/{}", name),
                "sha": from_sha,
            }))
            .send()
            .await?;
        let response = ensure_success(response, "GitHub").await?;
        if response.status() != StatusCode::CREATED {
            anyhow::bail!("GitHub API returned {} creating branch {}", response.status(), name);
        }
        Ok(())
    }

    async fn update_file(&self, repo: &str, update: FileUpdate<'_>) -> anyhow::Result<()> {
        let response = self
            .request(Method::PUT, repo, &format!("contents/{}", update.path))?
            .json(&json!({
                "message": update.message,
                "content": STANDARD.encode(update.content),
                "sha": update.sha,
                "branch": update.branch,
            }))
            .send()
            .await?;
        ensure_success(response, "GitHub").await?;
        Ok(())
    }

    async fn open_pull_request(
        &self,
        repo: &str,
        draft: PullRequestDraft<'_>,
    ) -> anyhow::Result<String> {
        let response = self
            .request(Method::POST, repo, "pulls")?
            .json(&json!({
                "title": draft.title,
                "head": draft.head,
                "base": draft.base,
                "body": draft.body,
            }))
            .send()
            .await?;
        let body: PullResponse = ensure_success(response, "GitHub").await?.json().await?;
        Ok(body.html_url)
    }
}
