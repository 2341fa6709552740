use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};
use vitals_core::types::DbId;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

#[derive(Default)]
struct Inner {
    /// Connection id -> outbound channel.
    connections: HashMap<String, WsSender>,
    /// Patient id -> connection ids currently subscribed to that patient.
    groups: HashMap<DbId, HashSet<String>>,
}

/// Tracks live WebSocket channels and which patient groups they joined.
///
/// Connections and group membership share one `RwLock`, so a publish sees
/// a consistent membership snapshot. A join that races a publish may or may
/// not receive that message.
pub struct SubscriptionRegistry {
    inner: RwLock<Inner>,
}

impl SubscriptionRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink. Re-using an id replaces the
    /// previous connection but keeps its group memberships.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.write().await.connections.insert(conn_id, tx);
        rx
    }

    /// Remove a connection and drop it from every group it joined.
    pub async fn remove(&self, conn_id: &str) {
        let mut inner = self.inner.write().await;
        inner.connections.remove(conn_id);
        inner.groups.retain(|_, members| {
            members.remove(conn_id);
            !members.is_empty()
        });
    }

    /// Add a connection to a patient's group.
    ///
    /// Returns `false` if the connection is unknown or was already a member.
    pub async fn join(&self, conn_id: &str, patient_id: DbId) -> bool {
        let mut inner = self.inner.write().await;
        if !inner.connections.contains_key(conn_id) {
            return false;
        }
        inner
            .groups
            .entry(patient_id)
            .or_default()
            .insert(conn_id.to_string())
    }

    /// Remove a connection from a patient's group.
    ///
    /// Returns `false` if it was not a member.
    pub async fn leave(&self, conn_id: &str, patient_id: DbId) -> bool {
        let mut inner = self.inner.write().await;
        let Some(members) = inner.groups.get_mut(&patient_id) else {
            return false;
        };
        let removed = members.remove(conn_id);
        if members.is_empty() {
            inner.groups.remove(&patient_id);
        }
        removed
    }

    /// Send a message to every connection in a patient's group.
    ///
    /// Returns the number of connections the message was handed to.
    /// Connections whose send channels are closed are skipped (they will be
    /// cleaned up when their receive loop ends).
    pub async fn publish(&self, patient_id: DbId, message: Message) -> usize {
        let inner = self.inner.read().await;
        let Some(members) = inner.groups.get(&patient_id) else {
            return 0;
        };
        members
            .iter()
            .filter_map(|id| inner.connections.get(id))
            .filter(|sender| sender.send(message.clone()).is_ok())
            .count()
    }

    /// Send a message to a single connection. Returns `false` if it is gone.
    pub async fn send_to(&self, conn_id: &str, message: Message) -> bool {
        self.inner
            .read()
            .await
            .connections
            .get(conn_id)
            .is_some_and(|sender| sender.send(message).is_ok())
    }

    /// Number of connections currently in a patient's group.
    pub async fn group_size(&self, patient_id: DbId) -> usize {
        self.inner
            .read()
            .await
            .groups
            .get(&patient_id)
            .map_or(0, HashSet::len)
    }

    /// Patient groups a connection belongs to, in ascending order.
    pub async fn groups_of(&self, conn_id: &str) -> Vec<DbId> {
        let inner = self.inner.read().await;
        let mut ids: Vec<DbId> = inner
            .groups
            .iter()
            .filter(|(_, members)| members.contains(conn_id))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }

    /// Send a Close frame to every connection, then clear all state.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops.
    pub async fn shutdown_all(&self) {
        let mut inner = self.inner.write().await;
        let count = inner.connections.len();
        for sender in inner.connections.values() {
            let _ = sender.send(Message::Close(None));
        }
        inner.connections.clear();
        inner.groups.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Ping every channel and drop the ones whose receiver is gone.
    ///
    /// Returns how many stale channels were removed.
    pub async fn ping_all(&self) -> usize {
        let mut inner = self.inner.write().await;
        let before = inner.connections.len();
        inner
            .connections
            .retain(|_, sender| sender.send(Message::Ping(Bytes::new())).is_ok());
        let stale = before - inner.connections.len();

        if stale > 0 {
            let Inner {
                connections,
                groups,
            } = &mut *inner;
            groups.retain(|_, members| {
                members.retain(|id| connections.contains_key(id));
                !members.is_empty()
            });
        }
        stale
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
