//! Demo data for local development.
//!
//! Only runs against an empty `patients` table, so it is safe to call on
//! every startup. All rows are written in one transaction.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::models::patient::CreatePatient;
use crate::models::vital_sign::CreateVitalSign;
use crate::repositories::{PatientRepo, VitalSignRepo};

/// (name, age, room, heart rate, systolic, diastolic, oxygen saturation)
const DEMO_PATIENTS: [(&str, i16, &str, i32, i32, i32, i32); 3] = [
    ("John Doe", 45, "101", 88, 118, 78, 97),
    ("Jane Smith", 32, "102", 105, 125, 85, 94),
    ("Bob Johnson", 67, "103", 130, 142, 92, 89),
];

/// Seed three patients with one reading each (normal, warning, critical).
///
/// Returns `false` without writing anything if any patient already exists.
/// Either every demo row is committed or none is.
pub async fn seed_demo_data(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let seeded = seed_demo_rows(&mut *tx).await?;
    tx.commit().await?;
    Ok(seeded)
}

/// Write the demo rows on an open connection, typically a transaction.
pub async fn seed_demo_rows(conn: &mut PgConnection) -> Result<bool, sqlx::Error> {
    if PatientRepo::count(&mut *conn).await? > 0 {
        tracing::debug!("Patients present, skipping demo seed");
        return Ok(false);
    }

    let now = Utc::now();
    for (name, age, room, heart_rate, systolic, diastolic, oxygen_saturation) in DEMO_PATIENTS {
        let patient = PatientRepo::create(
            &mut *conn,
            &CreatePatient {
                name: name.to_string(),
                age,
                room_number: room.to_string(),
            },
        )
        .await?;

        let vital = VitalSignRepo::create(
            &mut *conn,
            patient.id,
            &CreateVitalSign {
                heart_rate,
                systolic,
                diastolic,
                oxygen_saturation,
                measured_at: Some(now),
            },
        )
        .await?;

        tracing::info!(
            patient_id = patient.id,
            severity = %vital.severity,
            "Seeded demo patient"
        );
    }

    Ok(true)
}
