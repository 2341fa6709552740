use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::protocol::{ClientMessage, ServerMessage};
use crate::ws::registry::SubscriptionRegistry;

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with the
/// [`SubscriptionRegistry`] and managed by a sender task plus the
/// receive loop below.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.registry))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection.
///   2. Spawns a sender task that forwards messages from the registry channel.
///   3. Handles join/leave frames on the current task.
///   4. Cleans up (including group membership) on disconnect.
async fn handle_socket(socket: WebSocket, registry: Arc<SubscriptionRegistry>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let mut rx = registry.add(conn_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                let reply = dispatch(&registry, &conn_id, text.as_str()).await;
                registry.send_to(&conn_id, reply.to_message()).await;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    registry.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Apply one client frame and build the acknowledgement.
async fn dispatch(registry: &SubscriptionRegistry, conn_id: &str, text: &str) -> ServerMessage {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::JoinPatient { patient_id }) => {
            registry.join(conn_id, patient_id).await;
            tracing::debug!(conn_id, patient_id, "Joined patient group");
            ServerMessage::Joined { patient_id }
        }
        Ok(ClientMessage::LeavePatient { patient_id }) => {
            registry.leave(conn_id, patient_id).await;
            tracing::debug!(conn_id, patient_id, "Left patient group");
            ServerMessage::Left { patient_id }
        }
        Err(e) => {
            tracing::debug!(conn_id, error = %e, "Malformed WebSocket frame");
            ServerMessage::Error {
                message: format!("unrecognised message: {e}"),
            }
        }
    }
}
