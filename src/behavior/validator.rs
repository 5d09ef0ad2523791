//! Sample validation
//!
//! Turns an unstructured JSON payload into a [`RawSample`]. Axes are accepted
//! flat (`acceleration_x`, `mag_y`, `magnetometer_z`) or nested
//! (`acceleration: {x, y, z}`); `null` counts as missing.

use serde_json::{Map, Value};

use super::error::ValidationError;
use crate::models::{RawSample, SensorVariant, Vector3};

const COMPONENTS: [&str; 3] = ["x", "y", "z"];

/// One three-axis sensor and the keys it may arrive under
struct AxisGroup {
    /// Canonical flat names, reported in errors
    fields: [&'static str; 3],
    /// Flat key prefixes, e.g. `mag` for `mag_x`
    prefixes: &'static [&'static str],
    /// Nested object keys, e.g. `magnetometer` for `{"magnetometer": {"x": ..}}`
    groups: &'static [&'static str],
}

const ACCELERATION: AxisGroup = AxisGroup {
    fields: ["acceleration_x", "acceleration_y", "acceleration_z"],
    prefixes: &["acceleration"],
    groups: &["acceleration"],
};

const GYRO: AxisGroup = AxisGroup {
    fields: ["gyro_x", "gyro_y", "gyro_z"],
    prefixes: &["gyro"],
    groups: &["gyro"],
};

const MAGNETOMETER: AxisGroup = AxisGroup {
    fields: ["mag_x", "mag_y", "mag_z"],
    prefixes: &["mag", "magnetometer"],
    groups: &["magnetometer", "mag"],
};

impl AxisGroup {
    fn lookup<'a>(&self, obj: &'a Map<String, Value>, axis: usize) -> Option<&'a Value> {
        let component = COMPONENTS[axis];

        let flat = self
            .prefixes
            .iter()
            .filter_map(|prefix| obj.get(&format!("{}_{}", prefix, component)));
        let nested = self
            .groups
            .iter()
            .filter_map(|group| obj.get(*group))
            .filter_map(|group| group.get(component));

        flat.chain(nested).find(|v| !v.is_null())
    }

    fn is_present(&self, obj: &Map<String, Value>) -> bool {
        (0..COMPONENTS.len()).any(|axis| self.lookup(obj, axis).is_some())
    }

    fn read(&self, obj: &Map<String, Value>) -> Result<Vector3, ValidationError> {
        let mut values = [0.0f64; 3];
        for (axis, slot) in values.iter_mut().enumerate() {
            let field = self.fields[axis];
            let value = self
                .lookup(obj, axis)
                .ok_or(ValidationError::MissingField(field))?;
            *slot = parse_number(field, value)?;
        }
        Ok(Vector3::new(values[0], values[1], values[2]))
    }
}

/// Checks completeness and type correctness of a raw payload
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleValidator;

impl SampleValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a payload.
    ///
    /// Without a `variant` hint the sample is 9-axis iff any magnetometer
    /// field is present, and then the whole triple is required. `SixAxis`
    /// ignores magnetometer keys; `NineAxis` requires them.
    pub fn validate(
        &self,
        payload: &Value,
        variant: Option<SensorVariant>,
    ) -> Result<RawSample, ValidationError> {
        let obj = payload.as_object().ok_or(ValidationError::NotAnObject)?;

        let vehicle_id = read_vehicle_id(obj)?;
        let acceleration = ACCELERATION.read(obj)?;
        let gyro = GYRO.read(obj)?;

        let wants_magnetometer = match variant {
            Some(SensorVariant::SixAxis) => false,
            Some(SensorVariant::NineAxis) => true,
            None => MAGNETOMETER.is_present(obj),
        };
        let magnetometer = if wants_magnetometer {
            Some(MAGNETOMETER.read(obj)?)
        } else {
            None
        };

        let temperature = match obj.get("temperature") {
            None | Some(Value::Null) => None,
            Some(value) => Some(parse_number("temperature", value)?),
        };

        Ok(RawSample {
            vehicle_id,
            acceleration,
            gyro,
            magnetometer,
            temperature,
        })
    }
}

/// Longest vehicle id, in bytes, that the `vehicle_id` column holds.
pub const MAX_VEHICLE_ID_LEN: usize = 255;

fn read_vehicle_id(obj: &Map<String, Value>) -> Result<String, ValidationError> {
    const FIELD: &str = "vehicle_id";

    let id = match obj.get(FIELD) {
        None | Some(Value::Null) => return Err(ValidationError::MissingField(FIELD)),
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(ValidationError::MissingField(FIELD))
        }
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
        Some(_) => {
            return Err(ValidationError::InvalidField {
                field: FIELD,
                reason: "expected a string or integer".to_string(),
            })
        }
    };

    if let Some(reason) = vehicle_id_violation(&id) {
        return Err(ValidationError::InvalidField {
            field: FIELD,
            reason: reason.to_string(),
        });
    }
    Ok(id)
}

/// Why an id can never be stored, if it can't.
pub(crate) fn vehicle_id_violation(id: &str) -> Option<&'static str> {
    if id.len() > MAX_VEHICLE_ID_LEN {
        Some("must be at most 255 bytes")
    } else if id.contains('\0') {
        Some("must not contain NUL characters")
    } else {
        None
    }
}

/// Numbers and numeric strings are accepted; the result must be finite.
fn parse_number(field: &'static str, value: &Value) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(ValidationError::InvalidField {
            field,
            reason: "value must be finite".to_string(),
        }),
        None => Err(ValidationError::InvalidField {
            field,
            reason: format!("expected a number, got {}", value),
        }),
    }
}
