use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use gateway::config::AppConfig;
use gateway::state::AppState;
use gateway::storage::FileStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let store = FileStore::open(&config.storage.upload_dir)
        .await
        .context("Failed to open upload store")?;
    info!(
        dir = %config.storage.upload_dir.display(),
        max_upload_size = config.storage.max_upload_size,
        "Upload store ready"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState {
        config,
        store: Arc::new(store),
    };
    let app = gateway::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Gateway running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
