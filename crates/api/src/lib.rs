//! Vitals API server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! reading store, simulation, WebSocket fan-out) so integration tests and
//! the binary entrypoint can both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod notifications;
pub mod response;
pub mod router;
pub mod routes;
pub mod simulation;
pub mod state;
pub mod store;
pub mod ws;
