use std::sync::Arc;

use async_trait::async_trait;
use vitals_core::error::CoreError;
use vitals_core::types::DbId;
use vitals_core::vital_ranges;
use vitals_db::models::patient::Patient;
use vitals_db::models::vital_sign::{CreateVitalSign, UpdateVitalSign, VitalSign};
use vitals_db::repositories::{PatientRepo, VitalSignRepo};
use vitals_db::DbPool;
use vitals_events::{EventBus, VitalEvent};

use super::ReadingStore;
use crate::error::{AppError, AppResult};

/// PostgreSQL-backed store that announces committed writes on the event bus.
#[derive(Clone)]
pub struct PgReadingStore {
    pool: DbPool,
    event_bus: Arc<EventBus>,
}

impl PgReadingStore {
    pub fn new(pool: DbPool, event_bus: Arc<EventBus>) -> Self {
        Self { pool, event_bus }
    }

    /// On-commit hook: runs only after the write has succeeded.
    fn announce(&self, event: VitalEvent) {
        let receivers = self.event_bus.publish(event);
        tracing::trace!(receivers, "Announced vital change");
    }
}

/// The repositories report a missing or soft-deleted patient as
/// `RowNotFound`; a foreign-key violation means it was hard-deleted mid-write.
fn missing_parent(err: sqlx::Error, patient_id: DbId) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => CoreError::patient_not_found(patient_id).into(),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
            CoreError::patient_not_found(patient_id).into()
        }
        _ => err.into(),
    }
}

#[async_trait]
impl ReadingStore for PgReadingStore {
    async fn find_patient(&self, id: DbId) -> AppResult<Option<Patient>> {
        Ok(PatientRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_reading(
        &self,
        patient_id: DbId,
        input: &CreateVitalSign,
    ) -> AppResult<VitalSign> {
        vital_ranges::validate(&input.values())?;

        let vital = VitalSignRepo::create(&self.pool, patient_id, input)
            .await
            .map_err(|e| {
                tracing::warn!(patient_id, error = %e, "Create reading failed");
                missing_parent(e, patient_id)
            })?;

        tracing::info!(
            vital_id = vital.id,
            patient_id,
            severity = %vital.severity,
            "Created vital sign"
        );
        self.announce(VitalEvent::created(vital.id, vital.patient_id, vital.payload()));
        Ok(vital)
    }

    async fn update_reading(
        &self,
        id: DbId,
        input: &UpdateVitalSign,
    ) -> AppResult<Option<VitalSign>> {
        let Some(current) = VitalSignRepo::find_by_id(&self.pool, id).await? else {
            tracing::warn!(vital_id = id, "Update failed: vital sign not found");
            return Ok(None);
        };

        vital_ranges::validate(&input.merged_values(current.values()))?;

        let patient_id = input.patient_id.unwrap_or(current.patient_id);
        let Some(vital) = VitalSignRepo::update(&self.pool, id, input)
            .await
            .map_err(|e| {
                tracing::warn!(vital_id = id, patient_id, error = %e, "Update reading failed");
                missing_parent(e, patient_id)
            })?
        else {
            return Ok(None);
        };

        tracing::info!(
            vital_id = vital.id,
            patient_id = vital.patient_id,
            severity = %vital.severity,
            "Updated vital sign"
        );
        self.announce(VitalEvent::updated(vital.id, vital.patient_id, vital.payload()));
        Ok(Some(vital))
    }
}
