use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Open WebSocket channels.
    pub ws_connections: usize,
    /// Simulation runs currently producing readings.
    pub active_simulations: usize,
}

/// GET /health
///
/// Reports `degraded` when the database is unreachable; live channel and
/// simulation counts are included either way.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = vitals_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        ws_connections: state.registry.connection_count().await,
        active_simulations: state.simulations.active_count().await,
    })
}

/// Health routes, mounted at the root rather than under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
