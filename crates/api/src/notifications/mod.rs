//! Change notification fan-out.
//!
//! The [`ChangeNotifier`] subscribes to the event bus and forwards each
//! committed reading to the WebSocket group of its patient.

pub mod notifier;

pub use notifier::ChangeNotifier;
