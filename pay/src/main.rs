use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;
use voxchain_pay::{app_state, config::ConfigLoader, extractor::LlmExtractor, routes::routes};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConfigLoader::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.monitoring.log_level.as_str()),
    )
    .init();

    info!("🚀 VoxChain Pay");
    info!("   Extractor: {} ({})", config.extractor.model, config.extractor.endpoint);
    info!("   Network: {} (chain {})", config.wallet.network_name, config.wallet.required_chain_id);

    let extractor = Arc::new(LlmExtractor::new(&config.extractor)?);
    let app = routes(app_state(&config, extractor));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("VoxChain Pay API is running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
