//! Handlers for vital-sign readings.
//!
//! Readings are listed and created under their patient:
//! `/patients/{patient_id}/vitals`, and addressed directly at `/vitals/{id}`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use vitals_core::error::CoreError;
use vitals_core::types::DbId;
use vitals_db::models::vital_sign::{CreateVitalSign, UpdateVitalSign, VitalSign};
use vitals_db::repositories::VitalSignRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListVitalsParams {
    /// Return at most this many readings, newest first.
    pub limit: Option<i64>,
}

fn vital_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "VitalSign",
        id,
    })
}

/// GET /api/v1/patients/{patient_id}/vitals
///
/// Responds 404 when the patient has no readings.
pub async fn list_by_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<DbId>,
    Query(params): Query<ListVitalsParams>,
) -> AppResult<Json<DataResponse<Vec<VitalSign>>>> {
    if params.limit.is_some_and(|n| n <= 0) {
        return Err(AppError::BadRequest("limit must be positive".into()));
    }

    let vitals = VitalSignRepo::list_by_patient(&state.pool, patient_id, params.limit).await?;
    if vitals.is_empty() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "VitalSign for patient",
            id: patient_id,
        }));
    }
    Ok(Json(DataResponse { data: vitals }))
}

/// POST /api/v1/patients/{patient_id}/vitals
///
/// Manual reading entry. Severity is derived; subscribers of the patient
/// receive the new reading.
pub async fn create(
    State(state): State<AppState>,
    Path(patient_id): Path<DbId>,
    Json(input): Json<CreateVitalSign>,
) -> AppResult<(StatusCode, Json<DataResponse<VitalSign>>)> {
    let vital = state.store.create_reading(patient_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: vital })))
}

/// GET /api/v1/vitals/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VitalSign>>> {
    let vital = VitalSignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| vital_not_found(id))?;
    Ok(Json(DataResponse { data: vital }))
}

/// PUT /api/v1/vitals/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVitalSign>,
) -> AppResult<Json<DataResponse<VitalSign>>> {
    let vital = state
        .store
        .update_reading(id, &input)
        .await?
        .ok_or_else(|| vital_not_found(id))?;
    Ok(Json(DataResponse { data: vital }))
}

/// DELETE /api/v1/vitals/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if VitalSignRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(vital_not_found(id))
    }
}
