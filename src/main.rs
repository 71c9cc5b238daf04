//! RidePulse - synthetic ride-hailing trip analytics server
//!
//! Generates the trip dataset once at startup, then serves read-only
//! aggregate views over it.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ridepulse_backend::{api, config, Dataset};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    config::load_env();
    init_tracing();

    let config = config::ServerConfig::parse();
    config.validate()?;

    info!(
        trip_count = config.trip_count,
        seed = config.seed,
        "Generating dataset..."
    );
    let generator_config = config.generator();
    let dataset = tokio::task::spawn_blocking(move || Dataset::generate(generator_config))
        .await
        .context("Dataset generation task failed")?
        .context("Failed to generate dataset")?;

    let app = api::create_router(dataset);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("API server listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ridepulse_backend=debug,ridepulse=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Shutdown signal received");
}
