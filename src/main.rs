//! Slideshow server entry point.

use slideshow::config::ServerConfig;
use slideshow::server::{run_server, state::AppState};
use std::sync::Arc;
use tokio::sync::Notify;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("slideshow=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(static_dir = %config.static_dir.display(), "Using static file directory");

    // Shutdown signal
    let shutdown = Arc::new(Notify::new());
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        tracing::info!("Shutdown signal received");
        shutdown_ctrlc.notify_one();
    })?;

    let state = Arc::new(AppState::new());
    run_server(config, state, async move { shutdown.notified().await }).await?;

    tracing::info!("Slideshow server exited");
    Ok(())
}
