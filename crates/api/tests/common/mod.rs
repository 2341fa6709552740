#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use vitals_api::config::{ServerConfig, SimulationConfig};
use vitals_api::router::build_app_router;
use vitals_api::simulation::SimulationManager;
use vitals_api::state::AppState;
use vitals_api::store::{PgReadingStore, ReadingStore};
use vitals_api::ws::SubscriptionRegistry;
use vitals_events::EventBus;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        seed_demo_data: false,
        simulation: SimulationConfig {
            seed: Some(7),
            ..SimulationConfig::default()
        },
    }
}

/// Build the shared state the way `main.rs` does, minus background tasks.
pub fn build_test_state(pool: PgPool) -> AppState {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());
    let store: Arc<dyn ReadingStore> =
        Arc::new(PgReadingStore::new(pool.clone(), Arc::clone(&event_bus)));
    let simulations = Arc::new(SimulationManager::new(
        Arc::clone(&store),
        config.simulation.clone(),
    ));

    AppState {
        pool,
        config: Arc::new(config),
        registry: Arc::new(SubscriptionRegistry::new()),
        event_bus,
        store,
        simulations,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(build_test_state(pool), &test_config())
}

/// Send a request with an optional JSON body through the router.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a patient through the API and return its id.
pub async fn create_patient(app: Router, name: &str, room: &str) -> i64 {
    let response = post_json(
        app,
        "/api/v1/patients",
        serde_json::json!({ "name": name, "age": 50, "room_number": room }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
