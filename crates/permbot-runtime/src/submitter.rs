//! Change submission.
//!
//! Four strictly ordered steps against the environment repository:
//! read head commit, create branch, update file, open pull request. A failing
//! step ends the submission. Nothing is retried and a branch created before a
//! later failure is left in place.

use crate::adapter::{FileUpdate, PullRequestDraft, SourceRepository};
use crate::composer::ComposedChange;
use chrono::{DateTime, Utc};
use permbot_core::{ChangeRequest, ChangeSubject, SubmissionStep, WorkflowError};
use std::sync::Arc;

pub struct ChangeSubmitter {
    repository: Arc<dyn SourceRepository>,
    repo: String,
    main_branch: String,
    bot_name: String,
}

impl ChangeSubmitter {
    pub fn new(
        repository: Arc<dyn SourceRepository>,
        repo: impl Into<String>,
        main_branch: impl Into<String>,
        bot_name: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            repo: repo.into(),
            main_branch: main_branch.into(),
            bot_name: bot_name.into(),
        }
    }

    /// Build the change request for a composed change.
    pub fn prepare(
        &self,
        subject: &ChangeSubject<'_>,
        group: &str,
        change: ComposedChange,
        requested_at: DateTime<Utc>,
    ) -> ChangeRequest {
        let branch_name = ChangeRequest::branch_name(subject, requested_at);
        let target = format!("{}/{}.tf", group, subject.account);
        ChangeRequest {
            title: branch_name.clone(),
            branch_name,
            file_path: change.environment_path,
            content: change.content,
            file_sha: change.environment_sha,
            commit_message: format!("{} - updating {}", self.bot_name, target),
            body: format!(
                "{} - updating {} - adding {} permission for {}",
                self.bot_name, target, subject.permission, subject.user_name
            ),
            pull_request_url: None,
        }
    }

    /// Run the submission and record the pull request URL on success.
    pub async fn submit(&self, request: &mut ChangeRequest) -> Result<String, WorkflowError> {
        let repo = self.repo.as_str();
        let branch = request.branch_name.as_str();

        let head = self
            .repository
            .head_commit(repo, &self.main_branch)
            .await
            .map_err(|e| failed(SubmissionStep::ReadHeadCommit, branch, e))?;

        self.repository
            .create_branch(repo, branch, &head)
            .await
            .map_err(|e| failed(SubmissionStep::CreateBranch, branch, e))?;
        tracing::info!(repo, branch, from = %head, "branch created");

        self.repository
            .update_file(
                repo,
                FileUpdate {
                    path: &request.file_path,
                    content: &request.content,
                    sha: &request.file_sha,
                    branch,
                    message: &request.commit_message,
                },
            )
            .await
            .map_err(|e| failed(SubmissionStep::UpdateFile, branch, e))?;

        let url = self
            .repository
            .open_pull_request(
                repo,
                PullRequestDraft {
                    head: branch,
                    base: &self.main_branch,
                    title: &request.title,
                    body: &request.body,
                },
            )
            .await
            .map_err(|e| failed(SubmissionStep::OpenPullRequest, branch, e))?;
        tracing::info!(repo, branch, url = %url, "pull request opened");

        request.pull_request_url = Some(url.clone());
        Ok(url)
    }
}

fn failed(step: SubmissionStep, branch: &str, error: anyhow::Error) -> WorkflowError {
    tracing::error!(step = %step, branch, error = %error, "change submission failed");
    WorkflowError::ChangeSubmissionFailed { step }
}
