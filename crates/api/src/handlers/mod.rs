//! Request handlers for patients, their readings and simulation runs.
//!
//! Reads go straight to the repositories in `vitals_db`. Reading writes go
//! through the [`ReadingStore`](crate::store::ReadingStore) so they are
//! validated, classified and broadcast. Errors map via
//! [`AppError`](crate::error::AppError).

pub mod patient;
pub mod simulation;
pub mod vital_sign;
