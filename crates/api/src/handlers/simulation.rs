//! Handlers for starting and stopping synthetic-vitals runs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use vitals_core::error::CoreError;
use vitals_core::types::DbId;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SimulationStarted {
    pub started: bool,
    /// Patient the run is producing readings for.
    pub id: DbId,
}

/// POST /api/v1/patients/{patient_id}/simulation
///
/// Returns 202 once the run is scheduled; readings arrive over the
/// WebSocket as they are stored.
pub async fn start(
    State(state): State<AppState>,
    Path(patient_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<SimulationStarted>)> {
    let handle = state.simulations.start(patient_id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(SimulationStarted {
            started: true,
            id: handle.patient_id(),
        }),
    ))
}

/// DELETE /api/v1/patients/{patient_id}/simulation
pub async fn stop(
    State(state): State<AppState>,
    Path(patient_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if state.simulations.stop(patient_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound {
            entity: "Simulation for patient",
            id: patient_id,
        }
        .into())
    }
}
