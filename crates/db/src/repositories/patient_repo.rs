//! Repository for the `patients` table.

use sqlx::{PgExecutor, PgPool};
use vitals_core::types::DbId;

use crate::models::patient::{CreatePatient, Patient, UpdatePatient};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, age, room_number, deleted_at, created_at, updated_at";

/// Provides CRUD operations for patients.
pub struct PatientRepo;

impl PatientRepo {
    /// Insert a new patient, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreatePatient,
    ) -> Result<Patient, sqlx::Error> {
        let query = format!(
            "INSERT INTO patients (name, age, room_number)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Patient>(&query)
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.room_number)
            .fetch_one(executor)
            .await
    }

    /// Find a patient by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Patient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM patients WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Patient>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all patients ordered by room, then name. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<Patient>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM patients
             WHERE deleted_at IS NULL
             ORDER BY room_number ASC, name ASC"
        );
        sqlx::query_as::<_, Patient>(&query).fetch_all(pool).await
    }

    /// Count non-deleted patients.
    pub async fn count<'e>(executor: impl PgExecutor<'e>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM patients WHERE deleted_at IS NULL")
            .fetch_one(executor)
            .await
    }

    /// Update a patient. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePatient,
    ) -> Result<Option<Patient>, sqlx::Error> {
        let query = format!(
            "UPDATE patients SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                room_number = COALESCE($4, room_number)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Patient>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.room_number)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a patient and every reading it owns.
    ///
    /// Both updates run in one transaction. Returns `true` if the patient
    /// row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE patients SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        let readings = sqlx::query(
            "UPDATE vital_signs SET deleted_at = NOW() WHERE patient_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(
            patient_id = id,
            readings = readings.rows_affected(),
            "Soft-deleted patient and readings"
        );
        Ok(true)
    }

    /// Permanently delete a patient. Readings go with it via `ON DELETE CASCADE`.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
