//! Change request entities produced by the composer and consumed by the submitter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file read from a source repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// Decoded UTF-8 content.
    pub content: String,
    /// Blob hash, required for optimistic-concurrency updates.
    pub sha: String,
}

/// One branch + file update + pull request triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub branch_name: String,
    /// Environment file path inside the environment repository.
    pub file_path: String,
    /// Generated replacement for the whole file. Opaque to the bot.
    pub content: String,
    /// Blob hash of the file as read before branch creation.
    pub file_sha: String,
    pub commit_message: String,
    pub title: String,
    pub body: String,
    /// Set once the pull request is open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request_url: Option<String>,
}

/// Parameters that identify a change; everything in the branch name comes from here.
#[derive(Debug, Clone, Copy)]
pub struct ChangeSubject<'a> {
    pub service: &'a str,
    pub permission: &'a str,
    pub resource: &'a str,
    pub account: &'a str,
    pub user_name: &'a str,
}

impl ChangeRequest {
    /// Branch name for a change requested at `requested_at`.
    ///
    /// The millisecond timestamp suffix keeps names unique across requests
    /// that are otherwise identical.
    pub fn branch_name(subject: &ChangeSubject<'_>, requested_at: DateTime<Utc>) -> String {
        format!(
            "aws_permissions_bot_{}_{}_{}_in_{}_for_{}_{}",
            subject.service,
            subject.permission,
            subject.resource,
            subject.account,
            subject.user_name,
            requested_at.timestamp_millis()
        )
    }
}
