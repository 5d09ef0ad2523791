//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage: &'static str,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        storage: match state.config.storage_backend {
            crate::config::StorageBackend::Postgres => "postgres",
            crate::config::StorageBackend::Memory => "memory",
        },
        timestamp: chrono::Utc::now().timestamp(),
    })
}
