//! IMU Behavior Server
//!
//! Boots the HTTP transport in front of the driving-behavior core.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imu_behavior::{build_store, create_router, AppState, Config, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging; exactly one of the two fmt layers is installed
    let json = config.log_format() == LogFormat::Json;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "imu_behavior=debug,tower_http=debug".into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("IMU Behavior Server starting...");
    tracing::info!("Environment: {} ({:?} logs)", config.environment, config.log_format());
    tracing::info!("Storage backend: {:?}", config.storage_backend);
    tracing::info!("Database: {}", config.database_url.split('@').last().unwrap_or("***"));
    tracing::info!(
        "Thresholds: harsh_braking={} rapid_acceleration={} sharp_turn={}",
        config.thresholds.harsh_braking,
        config.thresholds.rapid_acceleration,
        config.thresholds.sharp_turn
    );

    let store = build_store(&config)
        .await
        .context("failed to initialise telemetry store")?;

    // Build application state
    let port = config.port;
    let app = create_router(AppState::new(store, config));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
