//! Boundary validation for raw vital inputs.
//!
//! Runs before classification on every write path. The classification
//! engine itself accepts any integer.

use crate::error::CoreError;
use crate::vitals::VitalValues;

pub const HEART_RATE_RANGE: (i32, i32) = (0, 300);
pub const SYSTOLIC_RANGE: (i32, i32) = (0, 300);
pub const DIASTOLIC_RANGE: (i32, i32) = (0, 200);
pub const OXYGEN_SATURATION_RANGE: (i32, i32) = (0, 100);

/// Check every field against its declared bounds, reporting the first
/// offending one.
pub fn validate(values: &VitalValues) -> Result<(), CoreError> {
    check("heart_rate", values.heart_rate, HEART_RATE_RANGE)?;
    check("systolic", values.systolic, SYSTOLIC_RANGE)?;
    check("diastolic", values.diastolic, DIASTOLIC_RANGE)?;
    check(
        "oxygen_saturation",
        values.oxygen_saturation,
        OXYGEN_SATURATION_RANGE,
    )
}

fn check(field: &'static str, value: i32, (min, max): (i32, i32)) -> Result<(), CoreError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::InvalidRange {
            field,
            value,
            min,
            max,
        })
    }
}
