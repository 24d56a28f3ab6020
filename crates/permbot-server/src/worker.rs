//! The second execution context: runs one workflow per dispatched event.

use crate::connectors::SecretBackedConnectors;
use crate::secrets::EnvSecretStore;
use async_trait::async_trait;
use permbot_adapter_aws::{
    AssumeRoleResourceLister, BedrockGenerator, OrganizationsDirectory, SecretsManagerStore,
    load_sdk_config,
};
use permbot_adapter_http::SlackCallback;
use permbot_core::config::{GeneratorProvider, SecretsBackend};
use permbot_core::{PermbotConfig, SlashCommandEvent};
use permbot_runtime::{
    AsyncDispatch, Orchestrator, SecretStore, TracingAuditSink, WorkflowOutcome, WorkflowSettings,
    WorkflowSuccess,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio_util::task::TaskTracker;

pub struct Worker {
    orchestrator: Orchestrator,
}

impl Worker {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// Wire the production collaborators described by `config`.
    pub async fn from_config(config: &PermbotConfig) -> Self {
        let sdk = load_sdk_config(config.aws.region.as_deref()).await;
        let secrets: Arc<dyn SecretStore> = match config.secrets.backend {
            SecretsBackend::Aws => {
                let secrets_sdk = load_sdk_config(Some(config.secrets.region.as_str())).await;
                Arc::new(SecretsManagerStore::new(&secrets_sdk))
            }
            SecretsBackend::Env => Arc::new(EnvSecretStore),
        };

        let mut connectors = SecretBackedConnectors::new(secrets, config.clone());
        if config.generator.provider == GeneratorProvider::Bedrock {
            let region = config
                .generator
                .region
                .as_deref()
                .or(config.aws.region.as_deref());
            let bedrock_sdk = load_sdk_config(region).await;
            connectors = connectors
                .with_generator(Arc::new(BedrockGenerator::new(&bedrock_sdk, &config.generator)));
        }

        let orchestrator = Orchestrator::new(
            WorkflowSettings::from_config(config),
            Arc::new(OrganizationsDirectory::new(&sdk)),
            Arc::new(AssumeRoleResourceLister::new(&sdk, config.aws.clone())),
            Arc::new(connectors),
            Arc::new(SlackCallback::new()),
            Arc::new(TracingAuditSink),
        );
        Self::new(orchestrator)
    }

    pub async fn handle(&self, event: &SlashCommandEvent) -> WorkflowOutcome {
        self.orchestrator.handle(event).await
    }
}

/// Machine-readable summary of a finished run.
pub fn summarize(outcome: &WorkflowOutcome) -> Value {
    let result = match &outcome.result {
        Ok(WorkflowSuccess::Help) => json!({ "status": "ok", "verb": "help" }),
        Ok(WorkflowSuccess::Listed { resources }) => {
            json!({ "status": "ok", "verb": "list", "resources": resources })
        }
        Ok(WorkflowSuccess::Granted {
            ticket_key,
            pull_request_url,
            branch_name,
        }) => json!({
            "status": "ok",
            "verb": "grant",
            "ticket_key": ticket_key,
            "pull_request_url": pull_request_url,
            "branch_name": branch_name,
        }),
        Err(e) => json!({ "status": "error", "kind": e.kind() }),
    };
    json!({
        "request_id": outcome.request_id.to_string(),
        "result": result,
        "message": outcome.message,
    })
}

/// Runs the worker on tasks of the current runtime.
///
/// Runs are tracked so shutdown can wait for them to post their message.
pub struct InProcessDispatch {
    worker: Arc<Worker>,
    tracker: TaskTracker,
}

impl InProcessDispatch {
    pub fn new(worker: Arc<Worker>, tracker: TaskTracker) -> Self {
        Self { worker, tracker }
    }
}

#[async_trait]
impl AsyncDispatch for InProcessDispatch {
    async fn dispatch(&self, event: &SlashCommandEvent) -> anyhow::Result<()> {
        let worker = Arc::clone(&self.worker);
        let event = event.clone();
        self.tracker.spawn(async move {
            let outcome = worker.handle(&event).await;
            tracing::debug!(request_id = %outcome.request_id, "in-process run finished");
        });
        Ok(())
    }
}
