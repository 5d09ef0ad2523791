//! Error handling
//!
//! Maps core error classifications onto HTTP status codes and a JSON body
//! of the form `{"error": {"kind", "detail"}, "status"}`.

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::behavior::{IngestionError, QueryError, StorageError, ValidationError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Caller errors
    MalformedBody(String),
    Validation(ValidationError),
    MissingVehicleId,

    // Store errors (transient)
    StorageUnavailable(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MalformedBody(_) | AppError::Validation(_) => "validation",
            AppError::MissingVehicleId => "query",
            AppError::StorageUnavailable(_) => "storage",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedBody(_) | AppError::Validation(_) | AppError::MissingVehicleId => {
                StatusCode::BAD_REQUEST
            }
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::MalformedBody(msg) => msg.clone(),
            AppError::Validation(err) => err.to_string(),
            AppError::MissingVehicleId => "Vehicle ID is required".to_string(),
            AppError::StorageUnavailable(msg) => {
                tracing::error!("Storage error: {}", msg);
                "Storage temporarily unavailable".to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "kind": self.kind(),
                "detail": detail,
            },
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable(msg) => AppError::StorageUnavailable(msg),
        }
    }
}

impl From<IngestionError> for AppError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::Validation(e) => e.into(),
            IngestionError::Storage(e) => e.into(),
        }
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::MissingVehicleId => AppError::MissingVehicleId,
            QueryError::Unavailable(msg) => AppError::StorageUnavailable(msg),
        }
    }
}
