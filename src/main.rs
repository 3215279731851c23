//! Cheese listing API server.
//!
//! Usage:
//!   cheese-api --port 8000 --page-size 10
//!
//! Data lives in memory and is gone when the process exits.

use anyhow::{Context, Result};
use cheese_api::api::{build_router, AppState};
use cheese_api::config::ServerConfig;
use cheese_api::lifecycle::CheeseSystem;
use clap::Parser;
use resource_actor::tracing::setup_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    setup_tracing(config.log_directive());

    let system = CheeseSystem::with_buffer_size(config.buffer_size);
    let page_size =
        usize::try_from(config.page_size).context("page size does not fit in memory")?;
    let app = build_router(AppState::from_system(&system, page_size));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(%address, page_size, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Ctrl-C received");
        })
        .await
        .context("HTTP server failed")?;

    // The router (and the clients in its state) is gone once serve returns.
    system
        .shutdown()
        .await
        .map_err(anyhow::Error::msg)
        .context("store shutdown failed")?;
    Ok(())
}
