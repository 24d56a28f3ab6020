//! Shared test infrastructure for workflow scenario tests.
//!
//! This module provides:
//! - Recording mock collaborators that count every call
//! - A `Scenario` describing what each collaborator returns
//! - A `Harness` wiring the mocks into an `Orchestrator`

#![allow(dead_code)]

use async_trait::async_trait;
use permbot_core::config::GithubConfig;
use permbot_core::{FileContent, SlashCommandEvent, SubmissionStep, Ticket};
use permbot_runtime::{
    AccountDirectory, AuditSink, ChatCallback, CodeGenerator, ConnectorFactory, Connectors,
    DirectoryService, FileUpdate, OnCallDirectory, Orchestrator, PullRequestDraft, ResourceLister,
    SourceRepository, Ticketing, WorkflowAuditEvent, WorkflowSettings,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// =============================================================================
// FIXTURES
// =============================================================================

pub const BOT: &str = "AWS Permissions bot";
pub const DOMAIN: &str = "example.com";
pub const ENV_REPO: &str = "terraform-environments";
pub const MODULE_REPO: &str = "terraform-modules";
pub const ACCOUNT_ID: &str = "111111111111";
pub const ENV_SHA: &str = "env-blob-sha";
pub const HEAD_SHA: &str = "head-commit-sha";
pub const PR_URL: &str = "https://github.com/acme/terraform-environments/pull/7";
pub const TICKET_KEY: &str = "SEC-42";
pub const GENERATED: &str = "module \"sso\" { generated = true }";

pub fn github_config() -> GithubConfig {
    GithubConfig {
        owner: "acme".to_string(),
        environment_repository: ENV_REPO.to_string(),
        module_repository: MODULE_REPO.to_string(),
        environment_sso_account_path: "sso/accounts".to_string(),
        module_sso_path: "modules/sso".to_string(),
        ..Default::default()
    }
}

pub fn settings() -> WorkflowSettings {
    WorkflowSettings {
        bot_name: BOT.to_string(),
        email_domain: DOMAIN.to_string(),
        group_prefix: "aws_".to_string(),
        github: github_config(),
        schedule_id: "PSCHED1".to_string(),
        project_key: "SEC".to_string(),
        issue_type: "10001".to_string(),
    }
}

pub fn event(text: &str) -> SlashCommandEvent {
    SlashCommandEvent {
        text: text.to_string(),
        user_name: "alice".to_string(),
        response_url: "https://hooks.slack.test/commands/1".to_string(),
    }
}

pub fn env_path(group: &str) -> String {
    format!("sso/accounts/{}/acct1.tf", group)
}

/// What every collaborator returns. Defaults describe a fully successful grant.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub accounts: HashMap<String, String>,
    pub org_unit: Option<String>,
    pub buckets: Vec<String>,
    pub queues: Vec<String>,
    pub groups: Vec<String>,
    pub files: HashMap<(String, String), FileContent>,
    pub generated: Result<String, String>,
    pub on_call: Option<String>,
    pub users: HashMap<String, String>,
    pub fail_step: Option<SubmissionStep>,
    pub connect_fails: bool,
    pub ticket_creation_fails: bool,
}

impl Default for Scenario {
    fn default() -> Self {
        let mut files = HashMap::new();
        files.insert(
            (ENV_REPO.to_string(), env_path("platform_rw")),
            file("module \"sso\" {}", ENV_SHA),
        );
        for name in ["variables.tf", "data.tf", "main.tf"] {
            files.insert(
                (MODULE_REPO.to_string(), format!("modules/sso/{}", name)),
                file(&format!("# {}", name), "module-sha"),
            );
        }

        Self {
            accounts: HashMap::from([("acct1".to_string(), ACCOUNT_ID.to_string())]),
            org_unit: Some("engineering".to_string()),
            buckets: vec!["b1".to_string(), "b2".to_string()],
            queues: vec![
                format!("https://sqs.us-east-1.amazonaws.com/{}/q1", ACCOUNT_ID),
                format!("https://sqs.us-east-1.amazonaws.com/{}/q2", ACCOUNT_ID),
            ],
            groups: vec!["aws_platform_rw".to_string()],
            files,
            generated: Ok(GENERATED.to_string()),
            on_call: Some("oncall@example.com".to_string()),
            users: HashMap::from([
                ("oncall@example.com".to_string(), "acc-oncall".to_string()),
                ("alice@example.com".to_string(), "acc-alice".to_string()),
                ("bob@example.com".to_string(), "acc-bob".to_string()),
            ]),
            fail_step: None,
            connect_fails: false,
            ticket_creation_fails: false,
        }
    }
}

pub fn file(content: &str, sha: &str) -> FileContent {
    FileContent {
        content: content.to_string(),
        sha: sha.to_string(),
    }
}

// =============================================================================
// MOCK COLLABORATORS
// =============================================================================

pub struct MockAccounts {
    accounts: HashMap<String, String>,
    org_unit: Option<String>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl AccountDirectory for MockAccounts {
    async fn resolve_account_id(&self, name: &str) -> anyhow::Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.get(name).cloned())
    }

    async fn resolve_org_unit(&self, _account_id: &str) -> anyhow::Result<Option<String>> {
        Ok(self.org_unit.clone())
    }
}

pub struct MockLister {
    buckets: Vec<String>,
    queues: Vec<String>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ResourceLister for MockLister {
    async fn list_buckets(&self, _account_id: &str) -> anyhow::Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.buckets.clone())
    }

    async fn list_queues(&self, _account_id: &str) -> anyhow::Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.queues.clone())
    }
}

pub struct MockDirectory {
    groups: Vec<String>,
    pub lookups: Mutex<Vec<String>>,
}

#[async_trait]
impl DirectoryService for MockDirectory {
    async fn groups_for_user(&self, email: &str) -> anyhow::Result<Vec<String>> {
        self.lookups.lock().unwrap().push(email.to_string());
        Ok(self.groups.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpdate {
    pub path: String,
    pub content: String,
    pub sha: String,
    pub branch: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPullRequest {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

pub struct MockRepository {
    files: HashMap<(String, String), FileContent>,
    fail_step: Option<SubmissionStep>,
    pub reads: Mutex<Vec<String>>,
    pub branches: Mutex<Vec<(String, String)>>,
    pub updates: Mutex<Vec<RecordedUpdate>>,
    pub pull_requests: Mutex<Vec<RecordedPullRequest>>,
}

impl MockRepository {
    fn check(&self, step: SubmissionStep) -> anyhow::Result<()> {
        if self.fail_step == Some(step) {
            anyhow::bail!("HTTP 422 at {}", step);
        }
        Ok(())
    }
}

#[async_trait]
impl SourceRepository for MockRepository {
    async fn read_file(
        &self,
        repo: &str,
        path: &str,
        _git_ref: Option<&str>,
    ) -> anyhow::Result<Option<FileContent>> {
        self.reads.lock().unwrap().push(path.to_string());
        Ok(self
            .files
            .get(&(repo.to_string(), path.to_string()))
            .cloned())
    }

    async fn head_commit(&self, _repo: &str, _branch: &str) -> anyhow::Result<String> {
        self.check(SubmissionStep::ReadHeadCommit)?;
        Ok(HEAD_SHA.to_string())
    }

    async fn create_branch(&self, _repo: &str, name: &str, from_sha: &str) -> anyhow::Result<()> {
        self.check(SubmissionStep::CreateBranch)?;
        self.branches
            .lock()
            .unwrap()
            .push((name.to_string(), from_sha.to_string()));
        Ok(())
    }

    async fn update_file(&self, _repo: &str, update: FileUpdate<'_>) -> anyhow::Result<()> {
        self.check(SubmissionStep::UpdateFile)?;
        self.updates.lock().unwrap().push(RecordedUpdate {
            path: update.path.to_string(),
            content: update.content.to_string(),
            sha: update.sha.to_string(),
            branch: update.branch.to_string(),
            message: update.message.to_string(),
        });
        Ok(())
    }

    async fn open_pull_request(
        &self,
        _repo: &str,
        draft: PullRequestDraft<'_>,
    ) -> anyhow::Result<String> {
        self.check(SubmissionStep::OpenPullRequest)?;
        self.pull_requests.lock().unwrap().push(RecordedPullRequest {
            head: draft.head.to_string(),
            base: draft.base.to_string(),
            title: draft.title.to_string(),
            body: draft.body.to_string(),
        });
        Ok(PR_URL.to_string())
    }
}

pub struct MockGenerator {
    output: Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl CodeGenerator for MockGenerator {
    async fn generate(&self, _system: &str, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.output.clone().map_err(anyhow::Error::msg)
    }
}

pub struct MockOnCall {
    email: Option<String>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl OnCallDirectory for MockOnCall {
    async fn on_call_email(&self, _schedule_id: &str) -> anyhow::Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.email.clone())
    }
}

pub struct MockTicketing {
    users: HashMap<String, String>,
    fail_create: bool,
    pub searches: Mutex<Vec<String>>,
    pub issues: Mutex<Vec<Ticket>>,
}

#[async_trait]
impl Ticketing for MockTicketing {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<String>> {
        self.searches.lock().unwrap().push(email.to_string());
        Ok(self.users.get(email).cloned())
    }

    async fn create_issue(&self, ticket: &Ticket) -> anyhow::Result<String> {
        if self.fail_create {
            anyhow::bail!("HTTP 400: field 'issuetype' is required");
        }
        self.issues.lock().unwrap().push(ticket.clone());
        Ok(TICKET_KEY.to_string())
    }
}

pub struct MockFactory {
    connectors: Connectors,
    fail: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ConnectorFactory for MockFactory {
    async fn connect(&self) -> anyhow::Result<Connectors> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("secret 'github-token' not found");
        }
        Ok(self.connectors.clone())
    }
}

#[derive(Default)]
pub struct MockChat {
    pub fail: bool,
    pub posts: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ChatCallback for MockChat {
    async fn post(&self, url: &str, text: &str) -> anyhow::Result<()> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), text.to_string()));
        if self.fail {
            anyhow::bail!("HTTP 404: expired_url");
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingAudit {
    pub events: Mutex<Vec<WorkflowAuditEvent>>,
}

impl AuditSink for RecordingAudit {
    fn record(&self, event: WorkflowAuditEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// =============================================================================
// HARNESS
// =============================================================================

pub struct Harness {
    pub accounts: Arc<MockAccounts>,
    pub lister: Arc<MockLister>,
    pub directory: Arc<MockDirectory>,
    pub repository: Arc<MockRepository>,
    pub generator: Arc<MockGenerator>,
    pub on_call: Arc<MockOnCall>,
    pub ticketing: Arc<MockTicketing>,
    pub factory: Arc<MockFactory>,
    pub chat: Arc<MockChat>,
    pub audit: Arc<RecordingAudit>,
}

impl Harness {
    pub fn new(scenario: Scenario) -> Self {
        Self::with_chat(scenario, MockChat::default())
    }

    pub fn with_chat(scenario: Scenario, chat: MockChat) -> Self {
        let directory = Arc::new(MockDirectory {
            groups: scenario.groups,
            lookups: Mutex::default(),
        });
        let repository = Arc::new(MockRepository {
            files: scenario.files,
            fail_step: scenario.fail_step,
            reads: Mutex::default(),
            branches: Mutex::default(),
            updates: Mutex::default(),
            pull_requests: Mutex::default(),
        });
        let generator = Arc::new(MockGenerator {
            output: scenario.generated,
            prompts: Mutex::default(),
        });
        let on_call = Arc::new(MockOnCall {
            email: scenario.on_call,
            calls: AtomicUsize::new(0),
        });
        let ticketing = Arc::new(MockTicketing {
            users: scenario.users,
            fail_create: scenario.ticket_creation_fails,
            searches: Mutex::default(),
            issues: Mutex::default(),
        });
        let factory = Arc::new(MockFactory {
            connectors: Connectors {
                directory: directory.clone(),
                repository: repository.clone(),
                generator: generator.clone(),
                on_call: on_call.clone(),
                ticketing: ticketing.clone(),
            },
            fail: scenario.connect_fails,
            calls: AtomicUsize::new(0),
        });

        Self {
            accounts: Arc::new(MockAccounts {
                accounts: scenario.accounts,
                org_unit: scenario.org_unit,
                calls: AtomicUsize::new(0),
            }),
            lister: Arc::new(MockLister {
                buckets: scenario.buckets,
                queues: scenario.queues,
                calls: AtomicUsize::new(0),
            }),
            directory,
            repository,
            generator,
            on_call,
            ticketing,
            factory,
            chat: Arc::new(chat),
            audit: Arc::new(RecordingAudit::default()),
        }
    }

    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(
            settings(),
            self.accounts.clone(),
            self.lister.clone(),
            self.factory.clone(),
            self.chat.clone(),
            self.audit.clone(),
        )
    }

    /// Texts posted to the chat callback, in order.
    pub fn posts(&self) -> Vec<String> {
        self.chat
            .posts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn branches(&self) -> Vec<String> {
        self.repository
            .branches
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn update_count(&self) -> usize {
        self.repository.updates.lock().unwrap().len()
    }

    pub fn pull_request_count(&self) -> usize {
        self.repository.pull_requests.lock().unwrap().len()
    }

    pub fn ticket_count(&self) -> usize {
        self.ticketing.issues.lock().unwrap().len()
    }

    pub fn generator_calls(&self) -> usize {
        self.generator.prompts.lock().unwrap().len()
    }

    pub fn listing_calls(&self) -> usize {
        self.lister.calls.load(Ordering::SeqCst)
    }

    /// Nothing beyond command parsing was touched.
    pub fn untouched(&self) -> bool {
        self.accounts.calls.load(Ordering::SeqCst) == 0
            && self.factory.calls.load(Ordering::SeqCst) == 0
            && self.listing_calls() == 0
            && self.directory.lookups.lock().unwrap().is_empty()
            && self.repository.reads.lock().unwrap().is_empty()
            && self.generator_calls() == 0
            && self.on_call.calls.load(Ordering::SeqCst) == 0
            && self.ticketing.searches.lock().unwrap().is_empty()
    }
}
