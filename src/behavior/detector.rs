//! Unsafe-driving event detection

use crate::models::Vector3;

/// Default harsh braking threshold (m/s²)
pub const HARSH_BRAKING_THRESHOLD: f64 = -2.0;

/// Default rapid acceleration threshold (m/s²)
pub const RAPID_ACCELERATION_THRESHOLD: f64 = 2.0;

/// Default sharp turn threshold (degrees/s)
pub const SHARP_TURN_THRESHOLD: f64 = 45.0;

/// Detection thresholds. Comparisons are strict: a reading equal to a
/// threshold does not trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventThresholds {
    /// Longitudinal acceleration below this is harsh braking
    pub harsh_braking: f64,

    /// Longitudinal acceleration above this is rapid acceleration
    pub rapid_acceleration: f64,

    /// Absolute yaw rate above this is a sharp turn
    pub sharp_turn: f64,
}

impl Default for EventThresholds {
    fn default() -> Self {
        Self {
            harsh_braking: HARSH_BRAKING_THRESHOLD,
            rapid_acceleration: RAPID_ACCELERATION_THRESHOLD,
            sharp_turn: SHARP_TURN_THRESHOLD,
        }
    }
}

/// Independent event flags; any combination may be set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFlags {
    pub harsh_braking: bool,
    pub rapid_acceleration: bool,
    pub sharp_turn: bool,
}

impl EventFlags {
    pub fn count(&self) -> u8 {
        [self.harsh_braking, self.rapid_acceleration, self.sharp_turn]
            .iter()
            .filter(|flag| **flag)
            .count() as u8
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventDetector {
    thresholds: EventThresholds,
}

impl EventDetector {
    pub fn new(thresholds: EventThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &EventThresholds {
        &self.thresholds
    }

    pub fn detect(&self, acceleration: &Vector3, gyro: &Vector3) -> EventFlags {
        EventFlags {
            harsh_braking: acceleration.x < self.thresholds.harsh_braking,
            rapid_acceleration: acceleration.x > self.thresholds.rapid_acceleration,
            sharp_turn: gyro.z.abs() > self.thresholds.sharp_turn,
        }
    }
}
