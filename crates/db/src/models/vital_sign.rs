//! Vital-sign reading model and DTOs.
//!
//! Neither DTO carries a severity: it is always derived from the four
//! measurements by the repository write path.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitals_core::severity::Severity;
use vitals_core::types::{DbId, Timestamp};
use vitals_core::vitals::{VitalPayload, VitalValues};

/// A reading row from the `vital_signs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VitalSign {
    pub id: DbId,
    pub patient_id: DbId,
    pub heart_rate: i32,
    pub systolic: i32,
    pub diastolic: i32,
    pub oxygen_saturation: i32,
    pub measured_at: Timestamp,
    #[sqlx(rename = "severity_id", try_from = "i16")]
    pub severity: Severity,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl VitalSign {
    pub fn values(&self) -> VitalValues {
        VitalValues {
            heart_rate: self.heart_rate,
            systolic: self.systolic,
            diastolic: self.diastolic,
            oxygen_saturation: self.oxygen_saturation,
        }
    }

    /// The compact form pushed to live subscribers.
    pub fn payload(&self) -> VitalPayload {
        VitalPayload::new(self.values(), Some(self.measured_at), self.severity)
    }
}

/// DTO for recording a new reading. The patient comes from the URL path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVitalSign {
    pub heart_rate: i32,
    pub systolic: i32,
    pub diastolic: i32,
    pub oxygen_saturation: i32,
    /// Defaults to the insert time if omitted.
    pub measured_at: Option<Timestamp>,
}

impl CreateVitalSign {
    pub fn from_values(values: VitalValues, measured_at: Option<Timestamp>) -> Self {
        Self {
            heart_rate: values.heart_rate,
            systolic: values.systolic,
            diastolic: values.diastolic,
            oxygen_saturation: values.oxygen_saturation,
            measured_at,
        }
    }

    pub fn values(&self) -> VitalValues {
        VitalValues {
            heart_rate: self.heart_rate,
            systolic: self.systolic,
            diastolic: self.diastolic,
            oxygen_saturation: self.oxygen_saturation,
        }
    }
}

/// DTO for correcting a reading. All fields are optional; severity is
/// recomputed from the merged result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVitalSign {
    /// Reassign the reading to another patient.
    pub patient_id: Option<DbId>,
    pub heart_rate: Option<i32>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    pub measured_at: Option<Timestamp>,
}

impl UpdateVitalSign {
    /// Overlay the provided fields on an existing reading's values.
    pub fn merged_values(&self, current: VitalValues) -> VitalValues {
        VitalValues {
            heart_rate: self.heart_rate.unwrap_or(current.heart_rate),
            systolic: self.systolic.unwrap_or(current.systolic),
            diastolic: self.diastolic.unwrap_or(current.diastolic),
            oxygen_saturation: self.oxygen_saturation.unwrap_or(current.oxygen_saturation),
        }
    }
}
