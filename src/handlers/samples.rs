//! Sample ingestion handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::models::{RecordId, SensorVariant};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub record_id: RecordId,
}

/// Ingest a sample, 6- or 9-axis by shape
pub async fn ingest(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<IngestResponse>)> {
    store_sample(&state, payload, None).await
}

/// Ingest from an MPU6050 (no magnetometer)
pub async fn ingest_mpu6050(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<IngestResponse>)> {
    store_sample(&state, payload, Some(SensorVariant::SixAxis)).await
}

/// Ingest from an MPU9250 (magnetometer required)
pub async fn ingest_mpu9250(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<IngestResponse>)> {
    store_sample(&state, payload, Some(SensorVariant::NineAxis)).await
}

async fn store_sample(
    state: &AppState,
    payload: Result<Json<Value>, JsonRejection>,
    variant: Option<SensorVariant>,
) -> AppResult<(StatusCode, Json<IngestResponse>)> {
    let Json(payload) = payload.map_err(|e| AppError::MalformedBody(e.body_text()))?;

    let record_id = match variant {
        Some(variant) => state.service.ingest_as(&payload, variant).await,
        None => state.service.ingest(&payload).await,
    }
    .map_err(|e| {
        tracing::debug!(kind = e.kind(), "Rejected IMU sample: {}", e.detail());
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(IngestResponse { record_id })))
}
