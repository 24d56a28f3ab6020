pub mod connectors;
pub mod lambda;
pub mod routes;
pub mod secrets;
pub mod state;
pub mod worker;

#[cfg(test)]
mod test_support;

pub use connectors::SecretBackedConnectors;
pub use routes::router;
pub use secrets::EnvSecretStore;
pub use state::AppState;
pub use worker::{InProcessDispatch, Worker, summarize};

use permbot_core::PermbotConfig;
use std::sync::Arc;

/// Bind the receiver and serve until interrupted, then let started runs finish.
pub async fn serve(cfg: PermbotConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::init(&cfg).await?);
    let in_flight = state.in_flight.clone();
    let app = router(state);

    let addr = cfg.server.bind.as_str();
    tracing::info!("permbot-server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    in_flight.close();
    if !in_flight.is_empty() {
        tracing::info!(runs = in_flight.len(), "waiting for in-flight runs");
    }
    in_flight.wait().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
