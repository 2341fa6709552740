//! Handlers for the `/patients` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
use vitals_core::error::CoreError;
use vitals_core::types::DbId;
use vitals_db::models::patient::{CreatePatient, Patient, UpdatePatient};
use vitals_db::repositories::PatientRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/patients
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePatient>,
) -> AppResult<(StatusCode, Json<DataResponse<Patient>>)> {
    input.validate()?;
    let patient = PatientRepo::create(&state.pool, &input).await?;
    tracing::info!(patient_id = patient.id, room = %patient.room_number, "Patient admitted");
    Ok((StatusCode::CREATED, Json(DataResponse { data: patient })))
}

/// GET /api/v1/patients
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Patient>>>> {
    let patients = PatientRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: patients }))
}

/// GET /api/v1/patients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Patient>>> {
    let patient = PatientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::patient_not_found(id))?;
    Ok(Json(DataResponse { data: patient }))
}

/// PUT /api/v1/patients/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePatient>,
) -> AppResult<Json<DataResponse<Patient>>> {
    input.validate()?;
    let patient = PatientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::patient_not_found(id))?;
    Ok(Json(DataResponse { data: patient }))
}

/// DELETE /api/v1/patients/{id}
///
/// Soft-deletes the patient and its readings, and stops any simulation
/// running for it.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if !PatientRepo::soft_delete(&state.pool, id).await? {
        return Err(CoreError::patient_not_found(id).into());
    }
    state.simulations.stop(id).await;
    tracing::info!(patient_id = id, "Patient discharged");
    Ok(StatusCode::NO_CONTENT)
}
