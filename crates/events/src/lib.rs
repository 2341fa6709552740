//! In-process change events for vital-sign readings.
//!
//! - [`EventBus`] -- publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`VitalEvent`] -- emitted by the reading store after a write commits.
//!
//! Delivery is best-effort and single-process: nothing is persisted and a
//! subscriber that falls too far behind skips events.

pub mod bus;

pub use bus::{EventBus, VitalChange, VitalEvent};
