use anyhow::Result;
use pagebot::config::Config;
use pagebot::gateway;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".parse().unwrap());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("pagebot {} starting", pagebot::VERSION);

    // Secrets are validated before any socket is bound
    let config = Config::from_env()?;
    gateway::start(&config).await
}
