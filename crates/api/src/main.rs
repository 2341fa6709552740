use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitals_api::config::ServerConfig;
use vitals_api::notifications::ChangeNotifier;
use vitals_api::router::build_app_router;
use vitals_api::simulation::SimulationManager;
use vitals_api::state::AppState;
use vitals_api::store::{PgReadingStore, ReadingStore};
use vitals_api::ws;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitals_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = vitals_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    vitals_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    vitals_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    if config.seed_demo_data {
        let seeded = vitals_db::seed::seed_demo_data(&pool)
            .await
            .expect("Failed to seed demo data");
        tracing::info!(seeded, "Demo data check complete");
    }

    // --- Event bus ---
    let event_bus = Arc::new(vitals_events::EventBus::default());

    // --- WebSocket registry + heartbeat ---
    let registry = Arc::new(ws::SubscriptionRegistry::new());
    let heartbeat_cancel = CancellationToken::new();
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&registry), heartbeat_cancel.clone());

    // Spawn the change notifier (pushes committed readings to patient groups).
    let notifier = ChangeNotifier::new(Arc::clone(&registry));
    let notifier_handle = tokio::spawn(notifier.run(event_bus.subscribe()));
    tracing::info!("Change notifier started");

    // --- Reading store + simulations ---
    let store: Arc<dyn ReadingStore> =
        Arc::new(PgReadingStore::new(pool.clone(), Arc::clone(&event_bus)));
    let simulations = Arc::new(SimulationManager::new(
        Arc::clone(&store),
        config.simulation.clone(),
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        registry: Arc::clone(&registry),
        event_bus: Arc::clone(&event_bus),
        store: Arc::clone(&store),
        simulations: Arc::clone(&simulations),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Stop simulations first; they are the only writers left.
    simulations
        .shutdown(Duration::from_secs(config.shutdown_timeout_secs))
        .await;

    // Release every sender handle so the broadcast channel closes and the
    // notifier loop ends.
    drop(simulations);
    drop(store);
    drop(event_bus);
    if tokio::time::timeout(Duration::from_secs(5), notifier_handle)
        .await
        .is_err()
    {
        tracing::warn!("Change notifier did not stop in time");
    } else {
        tracing::info!("Change notifier stopped");
    }

    let ws_count = registry.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    registry.shutdown_all().await;

    heartbeat_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), heartbeat_handle).await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
