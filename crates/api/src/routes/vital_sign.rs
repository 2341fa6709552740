use axum::routing::get;
use axum::Router;

use crate::handlers::vital_sign;
use crate::state::AppState;

/// Routes mounted at `/vitals`.
///
/// ```text
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(vital_sign::get_by_id)
            .put(vital_sign::update)
            .delete(vital_sign::delete),
    )
}
