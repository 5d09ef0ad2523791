//! Core error taxonomy
//!
//! Every failure is scoped to a single ingestion or query call. The core
//! returns a classification plus a detail string; the transport decides
//! status codes and message text.

use thiserror::Error;

/// Caller error, never retried automatically
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("payload must be a JSON object")]
    NotAnObject,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Write path unavailable; safe for the caller to retry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Read path failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("vehicle id is required")]
    MissingVehicleId,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IngestionError {
    /// Stable classification for the `error{kind, detail}` boundary shape
    pub fn kind(&self) -> &'static str {
        match self {
            IngestionError::Validation(_) => "validation",
            IngestionError::Storage(_) => "storage",
        }
    }

    pub fn detail(&self) -> String {
        self.to_string()
    }
}

impl QueryError {
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::MissingVehicleId => "query",
            QueryError::Unavailable(_) => "storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingestion_error_kind() {
        let err = IngestionError::from(ValidationError::MissingField("gyro_y"));
        assert_eq!(err.kind(), "validation");
        assert_eq!(err.detail(), "missing required field: gyro_y");

        let err = IngestionError::from(StorageError::Unavailable("pool closed".to_string()));
        assert_eq!(err.kind(), "storage");
        assert!(err.detail().contains("pool closed"));
    }
}
