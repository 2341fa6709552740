use std::sync::Arc;

use crate::config::ServerConfig;
use crate::simulation::SimulationManager;
use crate::store::ReadingStore;
use crate::ws::SubscriptionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vitals_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live WebSocket channels and their patient groups.
    pub registry: Arc<SubscriptionRegistry>,
    /// Bus that committed reading writes are announced on.
    pub event_bus: Arc<vitals_events::EventBus>,
    /// Write path for readings.
    pub store: Arc<dyn ReadingStore>,
    /// Active synthetic-vitals runs.
    pub simulations: Arc<SimulationManager>,
}
