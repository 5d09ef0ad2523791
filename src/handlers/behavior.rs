//! Driver behavior query handlers

use axum::{extract::{State, Path, Query}, Json};
use serde::{Deserialize, Serialize};

use crate::models::StoredRecord;
use crate::store::{QueryLimit, ALL_VEHICLES};
use crate::{AppResult, AppState};

#[derive(Debug, Deserialize, Default)]
pub struct BehaviorFilter {
    pub vehicle_id: Option<String>,
    /// Kept as text so a malformed limit falls back to the default
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LimitParams {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BehaviorListResponse {
    pub status: &'static str,
    pub data: Vec<StoredRecord>,
}

#[derive(Debug, Serialize)]
pub struct AverageScoreResponse {
    pub vehicle_id: String,
    pub average_score: f64,
}

/// List records; a missing or `all` vehicle id lists every vehicle
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<BehaviorFilter>,
) -> AppResult<Json<BehaviorListResponse>> {
    let vehicle_id = filter
        .vehicle_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(ALL_VEHICLES);
    let limit = QueryLimit::parse(filter.limit.as_deref());

    let data = state.service.list_behavior(vehicle_id, limit).await?;
    Ok(Json(BehaviorListResponse { status: "success", data }))
}

/// List records of one vehicle
pub async fn list_for_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<BehaviorListResponse>> {
    let limit = QueryLimit::parse(params.limit.as_deref());

    let data = state.service.list_behavior(&vehicle_id, limit).await?;
    Ok(Json(BehaviorListResponse { status: "success", data }))
}

/// Mean behavior score of one vehicle
pub async fn average(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> AppResult<Json<AverageScoreResponse>> {
    let average_score = state.service.average_score(&vehicle_id).await?;

    Ok(Json(AverageScoreResponse {
        vehicle_id,
        average_score,
    }))
}
