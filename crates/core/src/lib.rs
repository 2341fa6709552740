//! Pure domain logic for patient vital-sign monitoring.
//!
//! Nothing in this crate touches the database or the network. The
//! classification engine, range validation and synthetic-reading
//! synthesis all live here so they can be exercised in isolation.

pub mod error;
pub mod severity;
pub mod simulation;
pub mod types;
pub mod vital_ranges;
pub mod vitals;
