use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use franz_common::{init_logging, Config};
use franz_server::Server;
use franz_storage::{LogDirs, MetadataManager};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    init_logging(config.log_level);

    info!("starting franz broker");
    info!("binding to {}", config.address());

    let metadata = Arc::new(MetadataManager::new(LogDirs::default()));
    let listener = TcpListener::bind(config.address())
        .await
        .with_context(|| format!("failed to bind to {}", config.address()))?;

    let (server, shutdown_tx) = Server::new(listener, 1024, metadata);
    let server_handle = tokio::spawn(async move {
        if let Err(err) = server.run().await {
            error!("server error: {}", err);
        }
    });

    wait_for_shutdown_signal().await?;
    info!("received shutdown signal");

    // In-flight connections finish their current request; the accept loop
    // exits as soon as it observes the broadcast.
    let _ = shutdown_tx.send(());
    match tokio::time::timeout(Duration::from_secs(10), server_handle).await {
        Ok(result) => result.context("accept loop panicked")?,
        Err(_) => warn!("shutdown timed out waiting for the accept loop"),
    }

    info!("server shut down");
    Ok(())
}

async fn wait_for_shutdown_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.context("failed to listen for SIGINT")?,
        _ = sigterm.recv() => {}
    }
    Ok(())
}
