//! Severity classification engine.
//!
//! Pure, total and deterministic: every combination of integer inputs maps
//! to exactly one [`Severity`]. Range checking happens before this point
//! (see [`crate::vital_ranges`]); nothing here rejects input.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Aggregate severity of a vital reading.
///
/// Variants are ordered from least to most severe so that the overall
/// severity of a reading is simply the maximum of its per-dimension values.
/// Discriminants match the seed order of the `vital_severities` lookup table.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal = 1,
    Warning = 2,
    Critical = 3,
}

impl Severity {
    /// All severities, least severe first.
    pub const ALL: [Severity; 3] = [Severity::Normal, Severity::Warning, Severity::Critical];

    /// Return the database lookup ID.
    pub fn id(self) -> i16 {
        self as i16
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    /// Classify a full reading. Worst dimension wins.
    pub fn classify(heart_rate: i32, systolic: i32, diastolic: i32, oxygen_saturation: i32) -> Self {
        heart_rate_severity(heart_rate)
            .max(blood_pressure_severity(systolic, diastolic))
            .max(oxygen_severity(oxygen_saturation))
    }
}

impl TryFrom<i16> for Severity {
    type Error = CoreError;

    fn try_from(id: i16) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Severity::Normal),
            2 => Ok(Severity::Warning),
            3 => Ok(Severity::Critical),
            other => Err(CoreError::Internal(format!("unknown severity id {other}"))),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Lowest heart rate (bpm) considered normal.
pub const HEART_RATE_NORMAL_MIN: i32 = 60;
/// Lowest heart rate (bpm) in the elevated warning band.
pub const HEART_RATE_WARNING_MIN: i32 = 100;
/// Highest heart rate (bpm) still in the warning band.
pub const HEART_RATE_WARNING_MAX: i32 = 120;

/// Systolic pressure above this is critical.
pub const SYSTOLIC_CRITICAL_ABOVE: i32 = 139;
/// Diastolic pressure above this is critical.
pub const DIASTOLIC_CRITICAL_ABOVE: i32 = 90;
/// Systolic pressure at or above this is a warning.
pub const SYSTOLIC_WARNING_MIN: i32 = 120;
/// Diastolic pressure at or above this is a warning.
pub const DIASTOLIC_WARNING_MIN: i32 = 80;
/// Normal systolic floor.
pub const SYSTOLIC_NORMAL_MIN: i32 = 90;
/// Normal diastolic floor.
pub const DIASTOLIC_NORMAL_MIN: i32 = 60;

/// Oxygen saturation (%) below this is critical.
pub const OXYGEN_CRITICAL_BELOW: i32 = 90;
/// Highest oxygen saturation (%) still in the warning band.
pub const OXYGEN_WARNING_MAX: i32 = 95;

// ---------------------------------------------------------------------------
// Per-dimension rules
// ---------------------------------------------------------------------------

/// Bradycardia is a warning, never critical.
pub fn heart_rate_severity(heart_rate: i32) -> Severity {
    if heart_rate > HEART_RATE_WARNING_MAX {
        Severity::Critical
    } else if heart_rate >= HEART_RATE_WARNING_MIN || heart_rate < HEART_RATE_NORMAL_MIN {
        Severity::Warning
    } else {
        Severity::Normal
    }
}

/// Systolic and diastolic are judged jointly. A pair under the normal
/// floor is a warning, never normal.
pub fn blood_pressure_severity(systolic: i32, diastolic: i32) -> Severity {
    if systolic > SYSTOLIC_CRITICAL_ABOVE || diastolic > DIASTOLIC_CRITICAL_ABOVE {
        Severity::Critical
    } else if systolic >= SYSTOLIC_WARNING_MIN || diastolic >= DIASTOLIC_WARNING_MIN {
        Severity::Warning
    } else if systolic >= SYSTOLIC_NORMAL_MIN && diastolic >= DIASTOLIC_NORMAL_MIN {
        Severity::Normal
    } else {
        Severity::Warning
    }
}

pub fn oxygen_severity(oxygen_saturation: i32) -> Severity {
    if oxygen_saturation < OXYGEN_CRITICAL_BELOW {
        Severity::Critical
    } else if oxygen_saturation <= OXYGEN_WARNING_MAX {
        Severity::Warning
    } else {
        Severity::Normal
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
