mod api;
mod bootstrap;
mod config;
mod id;
mod model;
mod server;
mod store;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use api::AppState;
use config::{Args, Config};
use server::{Server, shutdown_signal};
use store::UserStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(&args)?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting userdb - in-memory user record store");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(UserStore::new());
    if config.seed {
        bootstrap::seed_store(&store).context("Failed to seed bootstrap user")?;
    }

    let server = Server::bind(
        &config.server_addr,
        AppState::new(store),
        config.request_timeout(),
    )
    .await
    .with_context(|| format!("Failed to bind {}", config.server_addr))?;
    info!("Server listening on: {}", server.local_addr());

    if let Err(e) = server.run(shutdown_signal()).await {
        error!("Failed to run: {}", e);
        return Err(e.into());
    }

    info!("System offline");
    Ok(())
}
