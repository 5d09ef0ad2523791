//! In-memory telemetry store
//!
//! Records are sharded per vehicle, each shard behind its own lock, so an
//! append for one vehicle never waits on another vehicle's readers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{QueryLimit, ScoreSummary, TelemetryStore};
use crate::behavior::error::{QueryError, StorageError};
use crate::models::{ProcessedRecord, RecordId, StoredRecord};

type Shard = Arc<RwLock<Vec<StoredRecord>>>;

#[derive(Debug, Default)]
pub struct MemoryTelemetryStore {
    shards: RwLock<HashMap<String, Shard>>,
    last_id: AtomicI64,
}

impl MemoryTelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records
    pub fn len(&self) -> usize {
        self.snapshot_shards().iter().map(|shard| shard.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn shard(&self, vehicle_id: &str) -> Shard {
        if let Some(shard) = self.shards.read().get(vehicle_id) {
            return Arc::clone(shard);
        }

        let mut shards = self.shards.write();
        Arc::clone(shards.entry(vehicle_id.to_string()).or_default())
    }

    fn existing_shard(&self, vehicle_id: &str) -> Option<Shard> {
        self.shards.read().get(vehicle_id).cloned()
    }

    fn snapshot_shards(&self) -> Vec<Shard> {
        self.shards.read().values().cloned().collect()
    }
}

/// Newest first, at most `limit` entries
fn newest_first<'a, I>(records: I, limit: QueryLimit) -> Vec<StoredRecord>
where
    I: IntoIterator<Item = &'a StoredRecord>,
{
    let mut refs: Vec<&StoredRecord> = records.into_iter().collect();
    refs.sort_by(|a, b| {
        b.record
            .timestamp
            .cmp(&a.record.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    });
    refs.truncate(limit.get() as usize);
    refs.into_iter().cloned().collect()
}

#[async_trait]
impl TelemetryStore for MemoryTelemetryStore {
    async fn append(&self, record: ProcessedRecord) -> Result<RecordId, StorageError> {
        let shard = self.shard(&record.vehicle_id);
        let id = RecordId(self.last_id.fetch_add(1, Ordering::Relaxed) + 1);

        shard.write().push(StoredRecord { id, record });
        Ok(id)
    }

    async fn query_by_vehicle(
        &self,
        vehicle_id: &str,
        limit: QueryLimit,
    ) -> Result<Vec<StoredRecord>, QueryError> {
        let Some(shard) = self.existing_shard(vehicle_id) else {
            return Ok(Vec::new());
        };

        let records = shard.read();
        Ok(newest_first(records.iter(), limit))
    }

    async fn query_all(&self, limit: QueryLimit) -> Result<Vec<StoredRecord>, QueryError> {
        // Each shard contributes its own newest `limit`, then the merge is cut again
        let mut candidates = Vec::new();
        for shard in self.snapshot_shards() {
            let records = shard.read();
            candidates.extend(newest_first(records.iter(), limit));
        }

        Ok(newest_first(candidates.iter(), limit))
    }

    async fn score_summary(&self, vehicle_id: &str) -> Result<ScoreSummary, QueryError> {
        let Some(shard) = self.existing_shard(vehicle_id) else {
            return Ok(ScoreSummary::default());
        };

        let records = shard.read();
        Ok(ScoreSummary {
            count: records.len() as i64,
            sum: records
                .iter()
                .map(|r| f64::from(r.record.behavior_score))
                .sum(),
        })
    }
}
