//! IMU driving-behavior service
//!
//! Ingests accelerometer/gyroscope (and optionally magnetometer) samples from
//! vehicles, flags unsafe-driving events, scores each sample and answers
//! per-vehicle queries.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    IMU BEHAVIOR SERVICE                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────────────────────────────┐  │
//! │  │  HTTP     │──▶│  IngestionPipeline                    │  │
//! │  │  (Axum)   │   │  validate → detect → heading → score  │  │
//! │  └─────┬─────┘   └──────────────────┬───────────────────┘  │
//! │        │  queries                   │ append               │
//! │        ▼                            ▼                      │
//! │  ┌──────────────────┐   ┌─────────────────────────────┐    │
//! │  │ AggregationSvc   │──▶│ TelemetryStore              │    │
//! │  └──────────────────┘   │ (PostgreSQL | in-memory)    │    │
//! │                         └─────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod models;
pub mod behavior;
pub mod store;
pub mod handlers;
pub mod error;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use behavior::BehaviorService;
pub use config::{Config, LogFormat, StorageBackend};
pub use error::{AppError, AppResult};
pub use store::{MemoryTelemetryStore, PgTelemetryStore, TelemetryStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: BehaviorService,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn TelemetryStore>, config: Config) -> Self {
        Self {
            service: BehaviorService::new(store, config.thresholds),
            config,
        }
    }
}

/// Open the configured store, applying migrations for Postgres
pub async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn TelemetryStore>> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;

            tracing::info!("Running database migrations...");
            db::run_migrations(&pool).await?;

            Ok(Arc::new(PgTelemetryStore::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store; records are lost on restart");
            Ok(Arc::new(MemoryTelemetryStore::new()))
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let ingest_routes = Router::new()
        .route("/api/v1/samples", post(handlers::samples::ingest))
        .route("/api/v1/samples/mpu6050", post(handlers::samples::ingest_mpu6050))
        .route("/api/v1/samples/mpu9250", post(handlers::samples::ingest_mpu9250));

    let query_routes = Router::new()
        .route("/api/v1/behavior", get(handlers::behavior::list))
        .route("/api/v1/vehicles/:vehicle_id/behavior", get(handlers::behavior::list_for_vehicle))
        .route("/api/v1/vehicles/:vehicle_id/behavior/average", get(handlers::behavior::average));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(ingest_routes)
        .merge(query_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
