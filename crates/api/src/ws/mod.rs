//! WebSocket transport for live vital-sign updates.
//!
//! Provides the subscription registry (connections and patient groups),
//! heartbeat monitoring, the wire protocol and the HTTP upgrade handler.

mod handler;
mod heartbeat;
pub mod protocol;
pub mod registry;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use protocol::{ClientMessage, ServerMessage};
pub use registry::SubscriptionRegistry;
