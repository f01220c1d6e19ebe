use std::sync::Arc;

use castwatch_core::config::CastwatchConfig;
use castwatch_proxy::ProxyClient;
use castwatch_registry::LiveRegistry;
use castwatch_store::CastwatchStore;
use castwatch_supervisor::Supervisor;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "castwatch=info".into()),
        )
        .init();

    let config_path = std::env::var("CASTWATCH_CONFIG").ok();
    let config = CastwatchConfig::load(config_path.as_deref())?;

    let store = Arc::new(CastwatchStore::open(&config.database.path)?);
    let registry = Arc::new(LiveRegistry::new());
    let proxy = Arc::new(ProxyClient::new(
        config.proxy.url.clone(),
        config.proxy.timeout_ms,
    ));

    let supervisor = Arc::new(Supervisor::new(
        store,
        registry,
        proxy,
        config.poll.clone(),
        config.chat.clone(),
    ));

    let started = supervisor.scan_and_start()?;
    info!(started, "castwatch supervisor running");

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    Ok(())
}
