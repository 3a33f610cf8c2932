use anyhow::Result;
use safeline::{config::Config, http, server::SafelineServer};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    // Initialize tracing with configurable log level
    let log_level = config.runtime.log_level.as_deref().unwrap_or("safeline=info");
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_ansi(false)
        .init();

    info!("Starting safeline assessment service");
    info!(
        "Configuration loaded: embedding={}, topics={}, db={} ({}:{})",
        config.system.embedding_provider,
        config.system.topic_provider,
        config.system.database_url,
        config.system.database_ns,
        config.system.database_db
    );

    let server = SafelineServer::new(config).await;

    http::start_http_server(server).await?;

    Ok(())
}
