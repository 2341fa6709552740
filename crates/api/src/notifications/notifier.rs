//! Event-to-subscriber fan-out.

use std::sync::Arc;

use tokio::sync::broadcast;
use vitals_events::VitalEvent;

use crate::ws::{ServerMessage, SubscriptionRegistry};

/// Publishes committed vital readings to live subscribers.
///
/// Delivery is at-most-once: a channel that is not in the patient's group
/// when the event is processed never sees it, and events skipped because
/// the notifier lagged behind the bus are not replayed.
pub struct ChangeNotifier {
    registry: Arc<SubscriptionRegistry>,
}

impl ChangeNotifier {
    pub fn new(registry: Arc<SubscriptionRegistry>) -> Self {
        Self { registry }
    }

    /// Run the main fan-out loop.
    ///
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](vitals_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<VitalEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.on_persisted(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Change notifier lagged, vitals dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, change notifier shutting down");
                    break;
                }
            }
        }
    }

    /// Push one persisted reading to its patient's group.
    ///
    /// Returns how many channels it was handed to.
    pub async fn on_persisted(&self, event: &VitalEvent) -> usize {
        let message = ServerMessage::ReceiveVital {
            patient_id: event.patient_id,
            vital: event.payload.clone(),
        };
        let delivered = self
            .registry
            .publish(event.patient_id, message.to_message())
            .await;
        tracing::debug!(
            vital_id = event.vital_id,
            patient_id = event.patient_id,
            change = ?event.change,
            delivered,
            "Published vital to subscribers"
        );
        delivered
    }
}
