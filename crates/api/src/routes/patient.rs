//! Route definitions for patients and their sub-resources.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{patient, simulation, vital_sign};
use crate::state::AppState;

/// Routes mounted at `/patients`.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// GET    /{id}                          -> get_by_id
/// PUT    /{id}                          -> update
/// DELETE /{id}                          -> delete
///
/// GET    /{id}/vitals                   -> vital_sign::list_by_patient
/// POST   /{id}/vitals                   -> vital_sign::create
///
/// POST   /{id}/simulation               -> simulation::start
/// DELETE /{id}/simulation               -> simulation::stop
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(patient::list).post(patient::create))
        .route(
            "/{id}",
            get(patient::get_by_id)
                .put(patient::update)
                .delete(patient::delete),
        )
        .route(
            "/{id}/vitals",
            get(vital_sign::list_by_patient).post(vital_sign::create),
        )
        .route(
            "/{id}/simulation",
            post(simulation::start).delete(simulation::stop),
        )
}
