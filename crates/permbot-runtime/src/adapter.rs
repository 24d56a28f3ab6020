//! Collaborator boundaries.
//!
//! Every external system the workflow touches sits behind one of these
//! traits. Implementations live in the adapter crates; the runtime only sees
//! `anyhow::Result` and converts failures into `WorkflowError` at the call
//! site.

use async_trait::async_trait;
use permbot_core::{FileContent, SlashCommandEvent, Ticket};
use std::sync::Arc;

/// Organization-level account lookup.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Map an account name to its id. `None` when no active account has that name.
    async fn resolve_account_id(&self, name: &str) -> anyhow::Result<Option<String>>;

    /// Name of the organizational unit containing the account.
    async fn resolve_org_unit(&self, account_id: &str) -> anyhow::Result<Option<String>>;
}

#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<String>;
}

/// Lists grantable resources inside a member account.
#[async_trait]
pub trait ResourceLister: Send + Sync {
    /// Bucket names, in the order the provider returns them.
    async fn list_buckets(&self, account_id: &str) -> anyhow::Result<Vec<String>>;

    /// Queue URLs, in the order the provider returns them.
    async fn list_queues(&self, account_id: &str) -> anyhow::Result<Vec<String>>;
}

#[async_trait]
pub trait CodeGenerator: Send + Sync {
    /// Generate text for `prompt` under the fixed `system` instruction.
    async fn generate(&self, system: &str, prompt: &str) -> anyhow::Result<String>;
}

/// Write of one file on a branch, guarded by the blob hash read earlier.
#[derive(Debug, Clone, Copy)]
pub struct FileUpdate<'a> {
    pub path: &'a str,
    pub content: &'a str,
    pub sha: &'a str,
    pub branch: &'a str,
    pub message: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct PullRequestDraft<'a> {
    pub head: &'a str,
    pub base: &'a str,
    pub title: &'a str,
    pub body: &'a str,
}

#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// Read a file, optionally at a ref. `None` when the file does not exist.
    async fn read_file(
        &self,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> anyhow::Result<Option<FileContent>>;

    /// Commit hash at the tip of `branch`.
    async fn head_commit(&self, repo: &str, branch: &str) -> anyhow::Result<String>;

    async fn create_branch(&self, repo: &str, name: &str, from_sha: &str) -> anyhow::Result<()>;

    async fn update_file(&self, repo: &str, update: FileUpdate<'_>) -> anyhow::Result<()>;

    /// Open a pull request and return its web URL.
    async fn open_pull_request(
        &self,
        repo: &str,
        draft: PullRequestDraft<'_>,
    ) -> anyhow::Result<String>;
}

/// Identity directory holding authorization groups.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Groups of the user that carry the authorization marker prefix.
    async fn groups_for_user(&self, email: &str) -> anyhow::Result<Vec<String>>;
}

#[async_trait]
pub trait OnCallDirectory: Send + Sync {
    /// Email of whoever is currently on call for the schedule.
    async fn on_call_email(&self, schedule_id: &str) -> anyhow::Result<Option<String>>;
}

#[async_trait]
pub trait Ticketing: Send + Sync {
    /// Ticketing account id for an email address.
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<String>>;

    /// Create the issue and return its key.
    async fn create_issue(&self, ticket: &Ticket) -> anyhow::Result<String>;
}

/// Delayed response channel of the chat platform.
#[async_trait]
pub trait ChatCallback: Send + Sync {
    async fn post(&self, url: &str, text: &str) -> anyhow::Result<()>;
}

/// Hands an event to a separately executed worker.
#[async_trait]
pub trait AsyncDispatch: Send + Sync {
    /// Returns once the event has been accepted for execution, not once it ran.
    async fn dispatch(&self, event: &SlashCommandEvent) -> anyhow::Result<()>;
}

/// Collaborators that need API credentials, built once per invocation.
#[derive(Clone)]
pub struct Connectors {
    pub directory: Arc<dyn DirectoryService>,
    pub repository: Arc<dyn SourceRepository>,
    pub generator: Arc<dyn CodeGenerator>,
    pub on_call: Arc<dyn OnCallDirectory>,
    pub ticketing: Arc<dyn Ticketing>,
}

/// Builds [`Connectors`], typically after reading tokens from a [`SecretStore`].
#[async_trait]
pub trait ConnectorFactory: Send + Sync {
    async fn connect(&self) -> anyhow::Result<Connectors>;
}
