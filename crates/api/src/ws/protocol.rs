//! JSON frames exchanged over the vitals WebSocket.

use axum::extract::ws::Message;
use serde::{Deserialize, Serialize};
use vitals_core::types::DbId;
use vitals_core::vitals::VitalPayload;

/// Frames sent by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    JoinPatient { patient_id: DbId },
    LeavePatient { patient_id: DbId },
}

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerMessage {
    ReceiveVital { patient_id: DbId, vital: VitalPayload },
    Joined { patient_id: DbId },
    Left { patient_id: DbId },
    Error { message: String },
}

impl ServerMessage {
    /// Encode as a text frame.
    pub fn to_message(&self) -> Message {
        // Serializing these enums cannot fail: every field is a plain value.
        let text = serde_json::to_string(self).unwrap_or_default();
        Message::Text(text.into())
    }
}
