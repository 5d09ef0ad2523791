//! Raw IMU sample model

use serde::{Deserialize, Serialize};

/// Three-axis reading (acceleration, angular rate or magnetic field)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Sensor package the sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorVariant {
    /// Accelerometer + gyroscope (MPU6050)
    SixAxis,
    /// Adds a magnetometer (MPU9250)
    NineAxis,
}

/// Validated sample, ready for event detection
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub vehicle_id: String,
    /// m/s²
    pub acceleration: Vector3,
    /// degrees/s
    pub gyro: Vector3,
    pub magnetometer: Option<Vector3>,
    pub temperature: Option<f64>,
}

impl RawSample {
    /// Variant is decided by the presence of the magnetometer triple alone.
    pub fn variant(&self) -> SensorVariant {
        match self.magnetometer {
            Some(_) => SensorVariant::NineAxis,
            None => SensorVariant::SixAxis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_follows_magnetometer() {
        let mut sample = RawSample {
            vehicle_id: "V1".to_string(),
            acceleration: Vector3::new(0.0, 0.0, 9.8),
            gyro: Vector3::new(0.0, 0.0, 0.0),
            magnetometer: None,
            temperature: None,
        };
        assert_eq!(sample.variant(), SensorVariant::SixAxis);

        sample.magnetometer = Some(Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(sample.variant(), SensorVariant::NineAxis);
    }
}
