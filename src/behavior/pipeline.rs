//! Ingestion pipeline
//!
//! validate -> detect -> heading -> score -> timestamp -> persist,
//! short-circuiting on the first failure. Nothing is written unless every
//! earlier step succeeded.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use serde_json::Value;

use super::detector::{EventDetector, EventThresholds};
use super::error::IngestionError;
use super::heading::HeadingCalculator;
use super::scorer::BehaviorScorer;
use super::validator::SampleValidator;
use crate::models::{ProcessedRecord, RawSample, RecordId, SensorVariant};
use crate::store::TelemetryStore;

#[derive(Clone)]
pub struct IngestionPipeline {
    validator: SampleValidator,
    detector: EventDetector,
    heading: HeadingCalculator,
    scorer: BehaviorScorer,
    store: Arc<dyn TelemetryStore>,
}

impl IngestionPipeline {
    pub fn new(store: Arc<dyn TelemetryStore>, thresholds: EventThresholds) -> Self {
        Self {
            validator: SampleValidator::new(),
            detector: EventDetector::new(thresholds),
            heading: HeadingCalculator,
            scorer: BehaviorScorer,
            store,
        }
    }

    /// Ingest a sample whose variant is decided by its shape
    pub async fn ingest(&self, payload: &Value) -> Result<RecordId, IngestionError> {
        self.run(payload, None).await
    }

    /// Ingest a sample from a known sensor package
    pub async fn ingest_as(
        &self,
        payload: &Value,
        variant: SensorVariant,
    ) -> Result<RecordId, IngestionError> {
        self.run(payload, Some(variant)).await
    }

    /// Classify a validated sample, stamping it with the current time
    pub fn process(&self, sample: RawSample) -> ProcessedRecord {
        self.process_at(sample, ingestion_time())
    }

    fn process_at(&self, sample: RawSample, timestamp: DateTime<Utc>) -> ProcessedRecord {
        let flags = self.detector.detect(&sample.acceleration, &sample.gyro);
        let heading = self.heading.heading(sample.magnetometer.as_ref());
        let behavior_score = self.scorer.score(&flags);

        ProcessedRecord {
            vehicle_id: sample.vehicle_id,
            timestamp,
            acceleration: sample.acceleration,
            gyro: sample.gyro,
            magnetometer: sample.magnetometer,
            temperature: sample.temperature,
            harsh_braking: flags.harsh_braking,
            rapid_acceleration: flags.rapid_acceleration,
            sharp_turn: flags.sharp_turn,
            behavior_score,
            heading,
        }
    }

    async fn run(
        &self,
        payload: &Value,
        variant: Option<SensorVariant>,
    ) -> Result<RecordId, IngestionError> {
        let sample = self.validator.validate(payload, variant)?;
        let record = self.process(sample);

        let vehicle_id = record.vehicle_id.clone();
        let score = record.behavior_score;
        let id = self.store.append(record).await?;

        tracing::debug!(%id, %vehicle_id, score, "Ingested IMU sample");
        Ok(id)
    }
}

/// Stored timestamps carry microsecond precision, the finest Postgres keeps
fn ingestion_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::error::{QueryError, StorageError, ValidationError};
    use crate::store::{MemoryTelemetryStore, QueryLimit, ScoreSummary};
    use crate::models::{StoredRecord, Vector3};
    use async_trait::async_trait;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn pipeline() -> (IngestionPipeline, Arc<MemoryTelemetryStore>) {
        let store = Arc::new(MemoryTelemetryStore::new());
        let pipeline = IngestionPipeline::new(store.clone(), EventThresholds::default());
        (pipeline, store)
    }

    async fn latest(store: &MemoryTelemetryStore, vehicle_id: &str) -> Vec<StoredRecord> {
        store.query_by_vehicle(vehicle_id, QueryLimit::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_six_axis_harsh_braking() {
        let (pipeline, store) = pipeline();
        let payload = json!({
            "vehicle_id": "V1",
            "acceleration": {"x": -3, "y": 0, "z": 9.8},
            "gyro": {"x": 0, "y": 0, "z": 10},
        });

        let id = assert_ok!(pipeline.ingest(&payload).await);
        let rows = latest(&store, "V1").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);

        let record = &rows[0].record;
        assert!(record.harsh_braking);
        assert!(!record.rapid_acceleration);
        assert!(!record.sharp_turn);
        assert_eq!(record.behavior_score, 80);
        assert_eq!(record.heading, None);

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert!(json.get("heading").is_none());
    }

    #[tokio::test]
    async fn test_nine_axis_rapid_acceleration_and_turn() {
        let (pipeline, store) = pipeline();
        let payload = json!({
            "vehicle_id": "V1",
            "acceleration": {"x": 3.5, "y": 0, "z": 9.8},
            "gyro": {"x": 0, "y": 0, "z": 60},
            "magnetometer": {"x": 0, "y": 1, "z": 0},
        });

        assert_ok!(pipeline.ingest(&payload).await);
        let record = latest(&store, "V1").await.remove(0).record;

        assert!(record.rapid_acceleration);
        assert!(record.sharp_turn);
        assert!(!record.harsh_braking);
        assert_eq!(record.behavior_score, 40);
        assert_eq!(record.heading, Some(90.0));
        assert_eq!(record.magnetometer, Some(Vector3::new(0.0, 1.0, 0.0)));
    }

    #[tokio::test]
    async fn test_validation_failure_leaves_store_unchanged() {
        let (pipeline, store) = pipeline();
        let payload = json!({
            "vehicle_id": "V1",
            "acceleration_x": 0.0, "acceleration_y": 0.0, "acceleration_z": 9.8,
            "gyro_x": 0.0, "gyro_z": 0.0,
        });

        let err = assert_err!(pipeline.ingest(&payload).await);
        assert_eq!(err, IngestionError::Validation(ValidationError::MissingField("gyro_y")));
        assert!(store.is_empty());
        assert!(latest(&store, "V1").await.is_empty());
    }

    #[tokio::test]
    async fn test_not_idempotent() {
        let (pipeline, store) = pipeline();
        let payload = json!({
            "vehicle_id": "V1",
            "acceleration_x": 0.0, "acceleration_y": 0.0, "acceleration_z": 9.8,
            "gyro_x": 0.0, "gyro_y": 0.0, "gyro_z": 0.0,
        });

        let a = pipeline.ingest(&payload).await.unwrap();
        let b = pipeline.ingest(&payload).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(latest(&store, "V1").await.len(), 2);
    }

    #[tokio::test]
    async fn test_timestamp_assigned_at_ingestion() {
        let (pipeline, store) = pipeline();
        let payload = json!({
            "vehicle_id": "V1",
            "timestamp": "1999-01-01T00:00:00Z",
            "acceleration_x": 0.0, "acceleration_y": 0.0, "acceleration_z": 9.8,
            "gyro_x": 0.0, "gyro_y": 0.0, "gyro_z": 0.0,
        });

        let before = Utc::now().trunc_subsecs(6);
        pipeline.ingest(&payload).await.unwrap();
        let after = Utc::now();

        let record = latest(&store, "V1").await.remove(0).record;
        assert!(record.timestamp >= before && record.timestamp <= after);
        assert_eq!(record.timestamp.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[tokio::test]
    async fn test_variant_routes() {
        let (pipeline, store) = pipeline();
        let six_axis = json!({
            "vehicle_id": "V9",
            "acceleration_x": 0.0, "acceleration_y": 0.0, "acceleration_z": 9.8,
            "gyro_x": 0.0, "gyro_y": 0.0, "gyro_z": 0.0,
        });

        let err = assert_err!(pipeline.ingest_as(&six_axis, SensorVariant::NineAxis).await);
        assert_eq!(err.kind(), "validation");
        assert!(store.is_empty());

        assert_ok!(pipeline.ingest_as(&six_axis, SensorVariant::SixAxis).await);
        assert_eq!(latest(&store, "V9").await.len(), 1);
    }

    #[test]
    fn test_process_is_deterministic_given_time() {
        let (pipeline, _) = pipeline();
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let sample = RawSample {
            vehicle_id: "V1".to_string(),
            acceleration: Vector3::new(-2.5, 0.0, 9.8),
            gyro: Vector3::new(0.0, 0.0, -50.0),
            magnetometer: Some(Vector3::new(-1.0, 0.0, 0.0)),
            temperature: Some(22.0),
        };

        let record = pipeline.process_at(sample, at);
        assert_eq!(record.timestamp, at);
        assert!(record.harsh_braking && record.sharp_turn);
        assert_eq!(record.behavior_score, 60);
        assert_eq!(record.heading, Some(180.0));
        assert_eq!(record.temperature, Some(22.0));
    }

    struct UnavailableStore;

    #[async_trait]
    impl TelemetryStore for UnavailableStore {
        async fn append(&self, _record: ProcessedRecord) -> Result<RecordId, StorageError> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }

        async fn query_by_vehicle(
            &self,
            _vehicle_id: &str,
            _limit: QueryLimit,
        ) -> Result<Vec<StoredRecord>, QueryError> {
            Err(QueryError::Unavailable("connection refused".to_string()))
        }

        async fn query_all(&self, _limit: QueryLimit) -> Result<Vec<StoredRecord>, QueryError> {
            Err(QueryError::Unavailable("connection refused".to_string()))
        }

        async fn score_summary(&self, _vehicle_id: &str) -> Result<ScoreSummary, QueryError> {
            Err(QueryError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_storage_failure_is_reported() {
        let pipeline = IngestionPipeline::new(Arc::new(UnavailableStore), EventThresholds::default());
        let payload = json!({
            "vehicle_id": "V1",
            "acceleration_x": 0.0, "acceleration_y": 0.0, "acceleration_z": 9.8,
            "gyro_x": 0.0, "gyro_y": 0.0, "gyro_z": 0.0,
        });

        let err = assert_err!(pipeline.ingest(&payload).await);
        assert_eq!(err.kind(), "storage");
        assert!(matches!(err, IngestionError::Storage(StorageError::Unavailable(_))));
    }
}
