//! PostgreSQL telemetry store

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::{QueryLimit, ScoreSummary, TelemetryStore};
use crate::behavior::error::{QueryError, StorageError};
use crate::models::{ProcessedRecord, ProcessedRecordRow, RecordId, StoredRecord};

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        QueryError::Unavailable(err.to_string())
    }
}

/// Store backed by the process-owned connection pool
#[derive(Debug, Clone)]
pub struct PgTelemetryStore {
    pool: PgPool,
}

impl PgTelemetryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TelemetryStore for PgTelemetryStore {
    async fn append(&self, record: ProcessedRecord) -> Result<RecordId, StorageError> {
        let mag = record.magnetometer;

        // Single statement: the row is either fully visible or absent
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO imu_behavior_records (
                vehicle_id,
                acceleration_x, acceleration_y, acceleration_z,
                gyro_x, gyro_y, gyro_z,
                mag_x, mag_y, mag_z,
                temperature, harsh_braking, rapid_acceleration, sharp_turn,
                behavior_score, heading, recorded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING id
            "#
        )
        .bind(&record.vehicle_id)
        .bind(record.acceleration.x)
        .bind(record.acceleration.y)
        .bind(record.acceleration.z)
        .bind(record.gyro.x)
        .bind(record.gyro.y)
        .bind(record.gyro.z)
        .bind(mag.map(|m| m.x))
        .bind(mag.map(|m| m.y))
        .bind(mag.map(|m| m.z))
        .bind(record.temperature)
        .bind(record.harsh_braking)
        .bind(record.rapid_acceleration)
        .bind(record.sharp_turn)
        .bind(i16::from(record.behavior_score))
        .bind(record.heading)
        .bind(record.timestamp)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Stored behavior record {} for vehicle {}", id, record.vehicle_id);
        Ok(RecordId(id))
    }

    async fn query_by_vehicle(
        &self,
        vehicle_id: &str,
        limit: QueryLimit,
    ) -> Result<Vec<StoredRecord>, QueryError> {
        let rows = sqlx::query_as::<_, ProcessedRecordRow>(
            r#"
            SELECT * FROM imu_behavior_records
            WHERE vehicle_id = $1
            ORDER BY recorded_at DESC, id DESC
            LIMIT $2
            "#
        )
        .bind(vehicle_id)
        .bind(i64::from(limit.get()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredRecord::from).collect())
    }

    async fn query_all(&self, limit: QueryLimit) -> Result<Vec<StoredRecord>, QueryError> {
        let rows = sqlx::query_as::<_, ProcessedRecordRow>(
            r#"
            SELECT * FROM imu_behavior_records
            ORDER BY recorded_at DESC, id DESC
            LIMIT $1
            "#
        )
        .bind(i64::from(limit.get()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredRecord::from).collect())
    }

    async fn score_summary(&self, vehicle_id: &str) -> Result<ScoreSummary, QueryError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS count,
                COALESCE(SUM(behavior_score), 0)::DOUBLE PRECISION AS sum
            FROM imu_behavior_records
            WHERE vehicle_id = $1
            "#
        )
        .bind(vehicle_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ScoreSummary {
            count: row.get::<i64, _>("count"),
            sum: row.get::<f64, _>("sum"),
        })
    }
}
