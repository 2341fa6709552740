pub mod health;
pub mod patient;
pub mod vital_sign;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                     WebSocket (join_patient / leave_patient)
///
/// /patients                               list, create
/// /patients/{id}                          get, update, delete
/// /patients/{id}/vitals                   list (newest first, ?limit=N), create
/// /patients/{id}/simulation               start (POST), stop (DELETE)
///
/// /vitals/{id}                            get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/patients", patient::router())
        .nest("/vitals", vital_sign::router())
}
