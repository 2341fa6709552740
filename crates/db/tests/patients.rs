//! Integration tests for `PatientRepo`, soft-delete cascading and seeding.

use sqlx::PgPool;
use validator::Validate;
use vitals_db::models::patient::{CreatePatient, UpdatePatient};
use vitals_db::models::vital_sign::CreateVitalSign;
use vitals_db::repositories::{PatientRepo, VitalSignRepo};

fn new_patient(name: &str, room: &str) -> CreatePatient {
    CreatePatient {
        name: name.to_string(),
        age: 40,
        room_number: room.to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_find(pool: PgPool) {
    let created = PatientRepo::create(&pool, &new_patient("Ada", "301"))
        .await
        .unwrap();
    let found = PatientRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("patient should exist");

    assert_eq!(found.name, "Ada");
    assert_eq!(found.room_number, "301");
    assert!(found.deleted_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_applies_only_provided_fields(pool: PgPool) {
    let created = PatientRepo::create(&pool, &new_patient("Grace", "302"))
        .await
        .unwrap();
    let updated = PatientRepo::update(
        &pool,
        created.id,
        &UpdatePatient {
            room_number: Some("410".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "Grace");
    assert_eq!(updated.room_number, "410");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn soft_delete_hides_patient_and_readings(pool: PgPool) {
    let patient = PatientRepo::create(&pool, &new_patient("Linus", "303"))
        .await
        .unwrap();
    VitalSignRepo::create(
        &pool,
        patient.id,
        &CreateVitalSign {
            heart_rate: 72,
            systolic: 115,
            diastolic: 75,
            oxygen_saturation: 98,
            measured_at: None,
        },
    )
    .await
    .unwrap();

    assert!(PatientRepo::soft_delete(&pool, patient.id).await.unwrap());
    assert!(!PatientRepo::soft_delete(&pool, patient.id).await.unwrap());

    assert!(PatientRepo::find_by_id(&pool, patient.id).await.unwrap().is_none());
    assert_eq!(
        VitalSignRepo::count_by_patient(&pool, patient.id).await.unwrap(),
        0
    );

    // History is retained.
    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vital_signs WHERE patient_id = $1")
        .bind(patient.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn hard_delete_cascades_to_readings(pool: PgPool) {
    let patient = PatientRepo::create(&pool, &new_patient("Barbara", "304"))
        .await
        .unwrap();
    let vital = VitalSignRepo::create(
        &pool,
        patient.id,
        &CreateVitalSign {
            heart_rate: 72,
            systolic: 115,
            diastolic: 75,
            oxygen_saturation: 98,
            measured_at: None,
        },
    )
    .await
    .unwrap();

    assert!(PatientRepo::hard_delete(&pool, patient.id).await.unwrap());
    assert!(!VitalSignRepo::hard_delete(&pool, vital.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn seed_runs_once(pool: PgPool) {
    assert!(vitals_db::seed::seed_demo_data(&pool).await.unwrap());
    assert!(!vitals_db::seed::seed_demo_data(&pool).await.unwrap());

    let patients = PatientRepo::list(&pool).await.unwrap();
    assert_eq!(patients.len(), 3);
    for patient in &patients {
        assert_eq!(
            VitalSignRepo::count_by_patient(&pool, patient.id).await.unwrap(),
            1
        );
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn seed_rows_roll_back_together(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    assert!(vitals_db::seed::seed_demo_rows(&mut *tx).await.unwrap());
    tx.rollback().await.unwrap();

    assert_eq!(PatientRepo::count(&pool).await.unwrap(), 0);
    let readings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vital_signs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(readings, 0);
}

#[test]
fn create_dto_rejects_out_of_range_age() {
    let mut input = new_patient("Too Old", "305");
    input.age = 121;
    assert!(input.validate().is_err());

    input.age = 120;
    assert!(input.validate().is_ok());
}

#[test]
fn create_dto_rejects_empty_name() {
    let input = new_patient("", "306");
    let errors = input.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("name"));
}
