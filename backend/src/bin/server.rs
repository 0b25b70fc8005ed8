//! Climate API HTTP Server Binary
//!
//! Loads configuration, opens the repository, and serves the API.
//!
//! # Usage
//!
//! ```bash
//! # Serve a local JSON seed file from memory (default backend)
//! LOCAL_SEED_PATH=data/hawaii.json cargo run --bin climate-server
//!
//! # Serve the SQLite dataset
//! DATABASE_URL=Resources/hawaii.sqlite \
//!   cargo run --bin climate-server --features "sqlite-repo"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 5000)
//! - `CLIMATE_CONFIG`: TOML configuration file (optional)
//! - `REPOSITORY_TYPE`: `sqlite` or `local` when no config file is used
//! - `DATABASE_URL`: SQLite database path (sqlite-repo feature)
//! - `LOCAL_SEED_PATH`: JSON seed file for the local repository
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use climate_api::config::{find_config_file, DatasetConfig, ServerConfig};
use climate_api::db::{ClimateRepository, RepositoryFactory};
use climate_api::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Climate API server");

    let config_file = find_config_file();
    let dataset = DatasetConfig::load(config_file.as_deref())
        .context("Invalid dataset configuration")?;
    info!(
        latest_date = %dataset.latest_date,
        cutoff = %dataset.cutoff(),
        most_active_station = %dataset.most_active_station,
        "Dataset configuration loaded"
    );

    let repository: Arc<dyn ClimateRepository> = match config_file {
        Some(ref path) => RepositoryFactory::from_config_file(path).await,
        None => RepositoryFactory::from_env().await,
    }
    .context("Failed to initialize repository")?;
    info!("Repository initialized successfully");

    let state = AppState::new(repository, dataset);
    let app = create_router(state);

    let server = ServerConfig::from_env()?;
    let addr = server.socket_addr()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
