//! Ingestion and query contract fronted by any transport

use std::sync::Arc;

use serde_json::Value;

use super::aggregation::AggregationService;
use super::detector::EventThresholds;
use super::error::{IngestionError, QueryError};
use super::pipeline::IngestionPipeline;
use super::validator::vehicle_id_violation;
use crate::models::{RecordId, SensorVariant, StoredRecord};
use crate::store::{QueryLimit, TelemetryStore, ALL_VEHICLES};

#[derive(Clone)]
pub struct BehaviorService {
    pipeline: IngestionPipeline,
    aggregation: AggregationService,
    store: Arc<dyn TelemetryStore>,
}

impl BehaviorService {
    pub fn new(store: Arc<dyn TelemetryStore>, thresholds: EventThresholds) -> Self {
        Self {
            pipeline: IngestionPipeline::new(Arc::clone(&store), thresholds),
            aggregation: AggregationService::new(Arc::clone(&store)),
            store,
        }
    }

    pub async fn ingest(&self, payload: &Value) -> Result<RecordId, IngestionError> {
        self.pipeline.ingest(payload).await
    }

    pub async fn ingest_as(
        &self,
        payload: &Value,
        variant: SensorVariant,
    ) -> Result<RecordId, IngestionError> {
        self.pipeline.ingest_as(payload, variant).await
    }

    /// Latest records for a vehicle, or for every vehicle when the id is `all`
    pub async fn list_behavior(
        &self,
        vehicle_id: &str,
        limit: QueryLimit,
    ) -> Result<Vec<StoredRecord>, QueryError> {
        let vehicle_id = vehicle_id.trim();
        if vehicle_id.is_empty() {
            return Err(QueryError::MissingVehicleId);
        }

        if vehicle_id == ALL_VEHICLES {
            self.store.query_all(limit).await
        } else if vehicle_id_violation(vehicle_id).is_some() {
            // never ingested, so nothing to read
            Ok(Vec::new())
        } else {
            self.store.query_by_vehicle(vehicle_id, limit).await
        }
    }

    pub async fn average_score(&self, vehicle_id: &str) -> Result<f64, QueryError> {
        let vehicle_id = vehicle_id.trim();
        if vehicle_id.is_empty() {
            return Err(QueryError::MissingVehicleId);
        }
        if vehicle_id_violation(vehicle_id).is_some() {
            return Ok(0.0);
        }
        self.aggregation.average_score(vehicle_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTelemetryStore;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn sample(vehicle_id: &str) -> Value {
        json!({
            "vehicle_id": vehicle_id,
            "acceleration_x": 0.0, "acceleration_y": 0.0, "acceleration_z": 9.8,
            "gyro_x": 0.0, "gyro_y": 0.0, "gyro_z": 0.0,
        })
    }

    fn service() -> BehaviorService {
        BehaviorService::new(Arc::new(MemoryTelemetryStore::new()), EventThresholds::default())
    }

    #[tokio::test]
    async fn test_all_sentinel_lists_every_vehicle() {
        let service = service();
        for vehicle in ["V1", "V2", "V1"] {
            service.ingest(&sample(vehicle)).await.unwrap();
        }

        let all = assert_ok!(service.list_behavior("all", QueryLimit::default()).await);
        assert_eq!(all.len(), 3);

        let v1 = assert_ok!(service.list_behavior("V1", QueryLimit::default()).await);
        assert_eq!(v1.len(), 2);
        assert!(v1.iter().all(|r| r.record.vehicle_id == "V1"));
    }

    #[tokio::test]
    async fn test_empty_vehicle_id_rejected() {
        let service = service();
        let err = assert_err!(service.list_behavior("  ", QueryLimit::default()).await);
        assert_eq!(err, QueryError::MissingVehicleId);
        assert_eq!(err.kind(), "query");

        let err = assert_err!(service.average_score("").await);
        assert_eq!(err, QueryError::MissingVehicleId);
    }

    #[tokio::test]
    async fn test_unknown_vehicle_is_empty_not_error() {
        let service = service();
        let rows = assert_ok!(service.list_behavior("ghost", QueryLimit::new(-3)).await);
        assert!(rows.is_empty());
        assert_eq!(assert_ok!(service.average_score("ghost").await), 0.0);
    }

    #[tokio::test]
    async fn test_unstorable_vehicle_id_is_validation_error() {
        let service = service();
        let too_long = "V".repeat(300);

        for vehicle in [too_long.as_str(), "V\u{0}1"] {
            let err = assert_err!(service.ingest(&sample(vehicle)).await);
            assert_eq!(err.kind(), "validation");

            let rows = assert_ok!(service.list_behavior(vehicle, QueryLimit::default()).await);
            assert!(rows.is_empty());
            assert_eq!(assert_ok!(service.average_score(vehicle).await), 0.0);
        }

        let all = assert_ok!(service.list_behavior("all", QueryLimit::default()).await);
        assert!(all.is_empty());
    }
}
