//! Telemetry persistence
//!
//! Append-only storage of processed records, read back newest-first.
//! Ordering is by ingestion timestamp, ties broken by the store-assigned id.

pub mod memory;
pub mod postgres;

pub use memory::MemoryTelemetryStore;
pub use postgres::PgTelemetryStore;

use async_trait::async_trait;

use crate::behavior::error::{QueryError, StorageError};
use crate::models::{ProcessedRecord, RecordId, StoredRecord};

/// Vehicle id meaning "no vehicle filter"
pub const ALL_VEHICLES: &str = "all";

/// Result-count cap for list queries. Out-of-range input is clamped,
/// never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimit(u32);

impl QueryLimit {
    pub const DEFAULT: u32 = 100;
    pub const MAX: u32 = 1000;

    /// `< 1` falls back to the default, `> 1000` is capped
    pub fn new(raw: i64) -> Self {
        if raw < 1 {
            Self(Self::DEFAULT)
        } else if raw > Self::MAX as i64 {
            Self(Self::MAX)
        } else {
            Self(raw as u32)
        }
    }

    /// Missing or unparseable text yields the default
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for QueryLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Raw material for score aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreSummary {
    pub count: i64,
    pub sum: f64,
}

#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// Atomically append one record; the id is unique within the store
    async fn append(&self, record: ProcessedRecord) -> Result<RecordId, StorageError>;

    /// Up to `limit` most recent records of one vehicle, newest first.
    /// Unknown vehicles yield an empty list.
    async fn query_by_vehicle(
        &self,
        vehicle_id: &str,
        limit: QueryLimit,
    ) -> Result<Vec<StoredRecord>, QueryError>;

    /// Same ordering as `query_by_vehicle`, across all vehicles
    async fn query_all(&self, limit: QueryLimit) -> Result<Vec<StoredRecord>, QueryError>;

    async fn score_summary(&self, vehicle_id: &str) -> Result<ScoreSummary, QueryError>;
}
