//! The reading store: the one write path for vital-sign readings.
//!
//! Every reading, whether entered by hand or synthesized by a simulation,
//! goes through a [`ReadingStore`]. The store validates ranges, persists the
//! row only while its patient is live (the insert classifies it) and, once the
//! write has committed, emits a [`VitalEvent`](vitals_events::VitalEvent)
//! on the event bus for live subscribers.

mod postgres;

use async_trait::async_trait;
use vitals_core::types::DbId;
use vitals_db::models::patient::Patient;
use vitals_db::models::vital_sign::{CreateVitalSign, UpdateVitalSign, VitalSign};

use crate::error::AppResult;

pub use postgres::PgReadingStore;

/// Persistence contract consumed by the simulator and the HTTP handlers.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Look up a live patient.
    async fn find_patient(&self, id: DbId) -> AppResult<Option<Patient>>;

    /// Persist a new reading for `patient_id`.
    ///
    /// Fails with `CoreError::NotFound` for an unknown patient and
    /// `CoreError::InvalidRange` for out-of-bounds inputs.
    async fn create_reading(&self, patient_id: DbId, input: &CreateVitalSign)
        -> AppResult<VitalSign>;

    /// Apply a correction to an existing reading, recomputing its severity.
    ///
    /// Returns `None` if the reading does not exist.
    async fn update_reading(
        &self,
        id: DbId,
        input: &UpdateVitalSign,
    ) -> AppResult<Option<VitalSign>>;
}
