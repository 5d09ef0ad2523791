//! Processed behavior record model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::sample::Vector3;

/// Store-assigned record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One classified sample. Immutable once appended to a store.
///
/// Field names are the wire contract relied on by dashboards:
/// `magnetometer` and `heading` are omitted for 6-axis samples,
/// `temperature` is `null` when the sensor did not report it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub vehicle_id: String,
    pub timestamp: DateTime<Utc>,
    pub acceleration: Vector3,
    pub gyro: Vector3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnetometer: Option<Vector3>,
    pub temperature: Option<f64>,
    pub harsh_braking: bool,
    pub rapid_acceleration: bool,
    pub sharp_turn: bool,
    pub behavior_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

/// A record as read back from a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: ProcessedRecord,
}

/// Flat row of the `imu_behavior_records` table
#[derive(Debug, Clone, FromRow)]
pub struct ProcessedRecordRow {
    pub id: i64,
    pub vehicle_id: String,
    pub acceleration_x: f64,
    pub acceleration_y: f64,
    pub acceleration_z: f64,
    pub gyro_x: f64,
    pub gyro_y: f64,
    pub gyro_z: f64,
    pub mag_x: Option<f64>,
    pub mag_y: Option<f64>,
    pub mag_z: Option<f64>,
    pub temperature: Option<f64>,
    pub harsh_braking: bool,
    pub rapid_acceleration: bool,
    pub sharp_turn: bool,
    pub behavior_score: i16,
    pub heading: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

impl From<ProcessedRecordRow> for StoredRecord {
    fn from(row: ProcessedRecordRow) -> Self {
        let magnetometer = match (row.mag_x, row.mag_y, row.mag_z) {
            (Some(x), Some(y), Some(z)) => Some(Vector3::new(x, y, z)),
            _ => None,
        };

        Self {
            id: RecordId(row.id),
            record: ProcessedRecord {
                vehicle_id: row.vehicle_id,
                timestamp: row.recorded_at,
                acceleration: Vector3::new(row.acceleration_x, row.acceleration_y, row.acceleration_z),
                gyro: Vector3::new(row.gyro_x, row.gyro_y, row.gyro_z),
                magnetometer,
                temperature: row.temperature,
                harsh_braking: row.harsh_braking,
                rapid_acceleration: row.rapid_acceleration,
                sharp_turn: row.sharp_turn,
                // CHECK constraint keeps the column in 0..=100
                behavior_score: row.behavior_score.clamp(0, 100) as u8,
                heading: row.heading,
            },
        }
    }
}
