//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the hub the reading store publishes committed writes to.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use vitals_core::types::DbId;
use vitals_core::vitals::VitalPayload;

// ---------------------------------------------------------------------------
// VitalEvent
// ---------------------------------------------------------------------------

/// What happened to the reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalChange {
    Created,
    Updated,
}

/// A reading write that has been committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalEvent {
    pub change: VitalChange,
    pub vital_id: DbId,
    /// Group key for fan-out.
    pub patient_id: DbId,
    pub payload: VitalPayload,
    /// When the event was emitted (UTC).
    pub timestamp: DateTime<Utc>,
}

impl VitalEvent {
    pub fn created(vital_id: DbId, patient_id: DbId, payload: VitalPayload) -> Self {
        Self::new(VitalChange::Created, vital_id, patient_id, payload)
    }

    pub fn updated(vital_id: DbId, patient_id: DbId, payload: VitalPayload) -> Self {
        Self::new(VitalChange::Updated, vital_id, patient_id, payload)
    }

    fn new(change: VitalChange, vital_id: DbId, patient_id: DbId, payload: VitalPayload) -> Self {
        Self {
            change,
            vital_id,
            patient_id,
            payload,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`VitalEvent`].
pub struct EventBus {
    sender: broadcast::Sender<VitalEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns the number of subscribers that will see it. With no
    /// subscribers the event is dropped.
    pub fn publish(&self, event: VitalEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::trace!("No event subscribers, dropping vital event");
                0
            }
        }
    }

    /// Subscribe to all events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<VitalEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
