//! Value types shared by the store, the simulator and the notifier.

use serde::{Deserialize, Serialize};

use crate::severity::Severity;
use crate::types::Timestamp;

/// The four raw measurements a reading is classified from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalValues {
    /// Beats per minute.
    pub heart_rate: i32,
    /// mmHg.
    pub systolic: i32,
    /// mmHg.
    pub diastolic: i32,
    /// Percent.
    pub oxygen_saturation: i32,
}

impl VitalValues {
    pub fn severity(&self) -> Severity {
        Severity::classify(
            self.heart_rate,
            self.systolic,
            self.diastolic,
            self.oxygen_saturation,
        )
    }
}

/// Compact reading pushed to live subscribers of a patient group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalPayload {
    pub heart_rate: i32,
    pub systolic: i32,
    pub diastolic: i32,
    pub oxygen_saturation: i32,
    pub measured_at: Option<Timestamp>,
    pub severity: Severity,
}

impl VitalPayload {
    pub fn new(values: VitalValues, measured_at: Option<Timestamp>, severity: Severity) -> Self {
        Self {
            heart_rate: values.heart_rate,
            systolic: values.systolic,
            diastolic: values.diastolic,
            oxygen_saturation: values.oxygen_saturation,
            measured_at,
            severity,
        }
    }
}
