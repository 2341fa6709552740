//! Repository for the `vital_signs` table.
//!
//! `severity_id` is written only here, always from
//! [`VitalValues::severity`](vitals_core::vitals::VitalValues::severity)
//! on the exact values being stored.

use sqlx::{PgExecutor, PgPool};
use vitals_core::types::DbId;

use crate::models::vital_sign::{CreateVitalSign, UpdateVitalSign, VitalSign};

/// Column list for `vital_signs` SELECT / RETURNING clauses.
const COLUMNS: &str = "\
    id, patient_id, heart_rate, systolic, diastolic, oxygen_saturation, \
    measured_at, severity_id, deleted_at, created_at, updated_at";

/// Provides CRUD operations for vital-sign readings.
pub struct VitalSignRepo;

impl VitalSignRepo {
    /// Insert a reading for `patient_id`, classifying it in the same statement.
    ///
    /// The insert only happens while the patient is live. Its row is share
    /// locked for the statement, so a concurrent soft delete either waits for
    /// the insert (and then marks the new reading deleted too) or wins and
    /// the insert finds no patient. A missing or soft-deleted patient yields
    /// `sqlx::Error::RowNotFound`.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        patient_id: DbId,
        input: &CreateVitalSign,
    ) -> Result<VitalSign, sqlx::Error> {
        let severity = input.values().severity();
        let query = format!(
            "INSERT INTO vital_signs \
                (patient_id, heart_rate, systolic, diastolic, oxygen_saturation, measured_at, severity_id) \
             SELECT p.id, $2, $3, $4, $5, COALESCE($6, NOW()), $7 \
             FROM patients p \
             WHERE p.id = $1 AND p.deleted_at IS NULL \
             FOR SHARE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VitalSign>(&query)
            .bind(patient_id)
            .bind(input.heart_rate)
            .bind(input.systolic)
            .bind(input.diastolic)
            .bind(input.oxygen_saturation)
            .bind(input.measured_at)
            .bind(severity.id())
            .fetch_one(executor)
            .await
    }

    /// Find a reading by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VitalSign>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM vital_signs WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, VitalSign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a patient's readings, newest measurement first.
    ///
    /// `limit` caps the number of rows; `None` returns all of them.
    pub async fn list_by_patient(
        pool: &PgPool,
        patient_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<VitalSign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vital_signs \
             WHERE patient_id = $1 AND deleted_at IS NULL \
             ORDER BY measured_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, VitalSign>(&query)
            .bind(patient_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Count a patient's non-deleted readings.
    pub async fn count_by_patient(pool: &PgPool, patient_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM vital_signs WHERE patient_id = $1 AND deleted_at IS NULL",
        )
        .bind(patient_id)
        .fetch_one(pool)
        .await
    }

    /// Apply a partial update and recompute severity before commit.
    ///
    /// The current row is locked while the merged values are classified.
    /// Returns `None` if no live reading with the given `id` exists. When the
    /// reading is reassigned, the target patient is share locked and a
    /// missing or soft-deleted target yields `sqlx::Error::RowNotFound`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVitalSign,
    ) -> Result<Option<VitalSign>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!(
            "SELECT {COLUMNS} FROM vital_signs \
             WHERE id = $1 AND deleted_at IS NULL \
             FOR UPDATE"
        );
        let Some(current) = sqlx::query_as::<_, VitalSign>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(target) = input.patient_id.filter(|p| *p != current.patient_id) {
            let live = sqlx::query_scalar::<_, DbId>(
                "SELECT id FROM patients WHERE id = $1 AND deleted_at IS NULL FOR SHARE",
            )
            .bind(target)
            .fetch_optional(&mut *tx)
            .await?;
            if live.is_none() {
                tx.rollback().await?;
                return Err(sqlx::Error::RowNotFound);
            }
        }

        let values = input.merged_values(current.values());
        let severity = values.severity();

        let update = format!(
            "UPDATE vital_signs SET \
                patient_id = COALESCE($2, patient_id), \
                heart_rate = $3, \
                systolic = $4, \
                diastolic = $5, \
                oxygen_saturation = $6, \
                measured_at = COALESCE($7, measured_at), \
                severity_id = $8 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, VitalSign>(&update)
            .bind(id)
            .bind(input.patient_id)
            .bind(values.heart_rate)
            .bind(values.systolic)
            .bind(values.diastolic)
            .bind(values.oxygen_saturation)
            .bind(input.measured_at)
            .bind(severity.id())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Soft-delete a reading. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE vital_signs SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a reading. Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vital_signs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
