//! Terminal workflow outcomes.
//!
//! Every failure the grant and list pipelines can hit maps to exactly one
//! variant here. The `Display` string is the sentence shown to the requester,
//! without the bot prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Step of the change-submission state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStep {
    ReadHeadCommit,
    CreateBranch,
    UpdateFile,
    OpenPullRequest,
}

impl fmt::Display for SubmissionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionStep::ReadHeadCommit => "read head commit",
            SubmissionStep::CreateBranch => "create branch",
            SubmissionStep::UpdateFile => "update file",
            SubmissionStep::OpenPullRequest => "open pull request",
        };
        f.write_str(name)
    }
}

/// Errors that end a workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// The command text did not match the grammar.
    #[error("Invalid command: {0}")]
    Usage(String),

    #[error("Account Not found")]
    AccountNotFound { account: String },

    #[error("Failed to read secrets, please contact the security team")]
    SecretRetrievalFailed,

    /// The requester has no authorization groups at all.
    #[error("User not allowed to perform queries to AWS")]
    Unauthorized { email: String },

    /// Several groups and no usable disambiguator.
    #[error("Multiple permission sets found, please specify a permission set name")]
    AmbiguousAuthorization { candidates: Vec<String> },

    #[error("Failed to read directory groups, please contact the security team")]
    DirectoryLookupFailed,

    #[error(
        "Cannot list for the requested service, please reach out to the security team for more information"
    )]
    UnsupportedService { service: String },

    #[error("Failed to list resources within the requested account, please contact the security team")]
    ResourceListingFailed,

    #[error("Resource not found within the requested account")]
    ResourceNotFound { resource: String },

    #[error("No permissions set found, please contact the security team for more information")]
    SourceFileMissing { path: String },

    #[error("Module files not found, please contact the security team for more information")]
    ModuleFileMissing { path: String },

    #[error("Code generation failed, please contact the security team")]
    GenerationFailed,

    #[error("Github pull request was not created ({step} failed), please contact the security team")]
    ChangeSubmissionFailed { step: SubmissionStep },

    #[error("Security on call email address was not found, please contact the security team")]
    OnCallLookupFailed,

    #[error("Assignee ID was not found, please contact the security team")]
    TicketAssigneeUnresolved,

    #[error("Requester ID was not found, please contact the security team")]
    TicketRequesterUnresolved,

    #[error("Jira task was not created, please contact the security team")]
    TicketCreationFailed,
}

impl WorkflowError {
    /// Stable tag used in logs and audit records.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::Usage(_) => "usage_error",
            WorkflowError::AccountNotFound { .. } => "account_not_found",
            WorkflowError::SecretRetrievalFailed => "secret_retrieval_failure",
            WorkflowError::Unauthorized { .. } => "unauthorized",
            WorkflowError::AmbiguousAuthorization { .. } => "ambiguous_authorization",
            WorkflowError::DirectoryLookupFailed => "directory_lookup_failure",
            WorkflowError::UnsupportedService { .. } => "unsupported_service",
            WorkflowError::ResourceListingFailed => "resource_listing_failure",
            WorkflowError::ResourceNotFound { .. } => "resource_not_found",
            WorkflowError::SourceFileMissing { .. } => "source_file_missing",
            WorkflowError::ModuleFileMissing { .. } => "module_file_missing",
            WorkflowError::GenerationFailed => "generation_failure",
            WorkflowError::ChangeSubmissionFailed { .. } => "change_submission_failure",
            WorkflowError::OnCallLookupFailed => "on_call_lookup_failure",
            WorkflowError::TicketAssigneeUnresolved => "ticket_assignee_unresolved",
            WorkflowError::TicketRequesterUnresolved => "ticket_requester_unresolved",
            WorkflowError::TicketCreationFailed => "ticket_creation_failure",
        }
    }
}
