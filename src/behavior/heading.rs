//! Compass heading from magnetometer axes

use crate::models::Vector3;

/// Heading in degrees, in `[0, 360)`, from the horizontal magnetic field.
///
/// Z is unused. A zero horizontal field (either sign of zero) yields 0°.
pub fn heading_degrees(mag_x: f64, mag_y: f64) -> f64 {
    if mag_x == 0.0 && mag_y == 0.0 {
        return 0.0;
    }

    let mut heading = mag_y.atan2(mag_x).to_degrees();
    if heading < 0.0 {
        heading += 360.0;
    }

    // -0.0 stays negative-zero, and a tiny negative angle rounds up to 360.0
    if heading == 0.0 || heading >= 360.0 {
        0.0
    } else {
        heading
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingCalculator;

impl HeadingCalculator {
    /// `None` for 6-axis samples: no heading is not the same as heading 0°
    pub fn heading(&self, magnetometer: Option<&Vector3>) -> Option<f64> {
        magnetometer.map(|mag| heading_degrees(mag.x, mag.y))
    }
}
