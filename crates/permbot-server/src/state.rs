use crate::worker::{InProcessDispatch, Worker};
use anyhow::Context;
use permbot_adapter_aws::{LambdaDispatch, load_sdk_config};
use permbot_core::PermbotConfig;
use permbot_core::config::DispatchMode;
use permbot_runtime::AsyncDispatch;
use std::sync::Arc;
use tokio_util::task::TaskTracker;

/// Shared receiver state.
pub struct AppState {
    pub cfg: PermbotConfig,
    pub dispatch: Arc<dyn AsyncDispatch>,
    /// Workflow runs started in this process.
    pub in_flight: TaskTracker,
}

impl AppState {
    pub async fn init(cfg: &PermbotConfig) -> anyhow::Result<Self> {
        let in_flight = TaskTracker::new();
        let dispatch: Arc<dyn AsyncDispatch> = match cfg.dispatch.mode {
            DispatchMode::InProcess => {
                let worker = Worker::from_config(cfg).await;
                Arc::new(InProcessDispatch::new(Arc::new(worker), in_flight.clone()))
            }
            DispatchMode::Lambda => {
                let function_name = cfg
                    .dispatch
                    .function_name
                    .clone()
                    .context("dispatch.function_name is required in lambda mode")?;
                let sdk = load_sdk_config(cfg.aws.region.as_deref()).await;
                Arc::new(LambdaDispatch::new(&sdk, function_name))
            }
        };
        tracing::info!(mode = ?cfg.dispatch.mode, "dispatch configured");

        Ok(Self {
            cfg: cfg.clone(),
            dispatch,
            in_flight,
        })
    }
}
