use permbot_core::PermbotConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .without_time()
        .init();

    let path = PermbotConfig::resolve_path(None);
    let cfg = PermbotConfig::from_file(&path)?;
    tracing::info!(config = %path.display(), "configuration loaded");

    permbot_server::lambda::run(&cfg).await
}
