//! Database module - PostgreSQL connection and migrations

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create tables if not exist
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Processed IMU samples (6-axis rows leave mag_* and heading NULL)
CREATE TABLE IF NOT EXISTS imu_behavior_records (
    id BIGSERIAL PRIMARY KEY,
    vehicle_id VARCHAR(255) NOT NULL,
    acceleration_x DOUBLE PRECISION NOT NULL,
    acceleration_y DOUBLE PRECISION NOT NULL,
    acceleration_z DOUBLE PRECISION NOT NULL,
    gyro_x DOUBLE PRECISION NOT NULL,
    gyro_y DOUBLE PRECISION NOT NULL,
    gyro_z DOUBLE PRECISION NOT NULL,
    mag_x DOUBLE PRECISION,
    mag_y DOUBLE PRECISION,
    mag_z DOUBLE PRECISION,
    temperature DOUBLE PRECISION,
    harsh_braking BOOLEAN NOT NULL,
    rapid_acceleration BOOLEAN NOT NULL,
    sharp_turn BOOLEAN NOT NULL,
    behavior_score SMALLINT NOT NULL CHECK (behavior_score BETWEEN 0 AND 100),
    heading DOUBLE PRECISION CHECK (heading >= 0 AND heading < 360),
    recorded_at TIMESTAMPTZ NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_imu_behavior_vehicle_time
    ON imu_behavior_records(vehicle_id, recorded_at DESC, id DESC);
CREATE INDEX IF NOT EXISTS idx_imu_behavior_time
    ON imu_behavior_records(recorded_at DESC, id DESC);
"#;
