//! Stub collaborators for worker and Lambda handler tests.

use crate::worker::Worker;
use async_trait::async_trait;
use permbot_core::{PermbotConfig, SlashCommandEvent};
use permbot_runtime::{
    AccountDirectory, ChatCallback, ConnectorFactory, Connectors, Orchestrator, ResourceLister,
    TracingAuditSink, WorkflowSettings,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn event(text: &str) -> SlashCommandEvent {
    SlashCommandEvent {
        text: text.to_string(),
        user_name: "alice".to_string(),
        response_url: "https://hooks.slack.com/commands/1".to_string(),
    }
}

/// Chat callback that records posts, optionally after a delay.
#[derive(Default)]
pub struct RecordingChat {
    delay: Duration,
    posts: Mutex<Vec<(String, String)>>,
}

impl RecordingChat {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn posts(&self) -> Vec<(String, String)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCallback for RecordingChat {
    async fn post(&self, url: &str, text: &str) -> anyhow::Result<()> {
        tokio::time::sleep(self.delay).await;
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), text.to_string()));
        Ok(())
    }
}

/// Every account, listing and connector call fails.
struct Offline;

#[async_trait]
impl AccountDirectory for Offline {
    async fn resolve_account_id(&self, _name: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("offline")
    }

    async fn resolve_org_unit(&self, _account_id: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("offline")
    }
}

#[async_trait]
impl ResourceLister for Offline {
    async fn list_buckets(&self, _account_id: &str) -> anyhow::Result<Vec<String>> {
        anyhow::bail!("offline")
    }

    async fn list_queues(&self, _account_id: &str) -> anyhow::Result<Vec<String>> {
        anyhow::bail!("offline")
    }
}

#[async_trait]
impl ConnectorFactory for Offline {
    async fn connect(&self) -> anyhow::Result<Connectors> {
        anyhow::bail!("offline")
    }
}

/// A worker that can only answer `help` and report failures.
pub fn help_worker(chat: Arc<RecordingChat>) -> Worker {
    Worker::new(Orchestrator::new(
        WorkflowSettings::from_config(&PermbotConfig::default()),
        Arc::new(Offline),
        Arc::new(Offline),
        Arc::new(Offline),
        chat,
        Arc::new(TracingAuditSink),
    ))
}
