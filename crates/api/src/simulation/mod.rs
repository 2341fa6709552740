//! Synthetic vitals simulation.
//!
//! A simulation run produces one synthesized reading per tick for a single
//! patient until its duration elapses or it is cancelled. Readings go
//! through the [`ReadingStore`](crate::store::ReadingStore) like any other
//! write, so they are classified and broadcast the same way.

pub mod generator;
pub mod manager;

pub use generator::{SimulationReport, VitalGenerator};
pub use manager::{SimulationHandle, SimulationManager};
