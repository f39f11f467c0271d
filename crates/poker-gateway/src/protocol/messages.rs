//! Wire envelope
//!
//! Every frame in either direction is a JSON object of the form
//! `{ message_type, content, room_id, user_id }`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ErrorPayload, MessageType};

/// Sender id on messages the server originates on its own
pub const SYSTEM_SENDER: &str = "system";

/// Room session message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Event name, see [`MessageType`]
    pub message_type: String,

    /// Event payload; a missing or null value reads as `{}`
    #[serde(default = "empty_object")]
    pub content: Value,

    #[serde(default)]
    pub room_id: String,

    /// Acting participant, or `"system"`
    #[serde(default)]
    pub user_id: String,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl WireMessage {
    /// Create a message on behalf of a participant
    #[must_use]
    pub fn new(
        kind: MessageType,
        content: Value,
        room_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            message_type: kind.as_str().to_string(),
            content,
            room_id: room_id.into(),
            user_id: user_id.into(),
        }
    }

    /// Create a message whose content is a serialized payload
    #[must_use]
    pub fn from_payload<T: Serialize>(
        kind: MessageType,
        payload: &T,
        room_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let content = serde_json::to_value(payload).unwrap_or_else(|_| empty_object());
        Self::new(kind, content, room_id, user_id)
    }

    /// Create a server-originated message
    #[must_use]
    pub fn system(kind: MessageType, content: Value, room_id: impl Into<String>) -> Self {
        Self::new(kind, content, room_id, SYSTEM_SENDER)
    }

    /// Create a private error reply
    #[must_use]
    pub fn error(room_id: impl Into<String>, payload: &ErrorPayload) -> Self {
        Self::from_payload(MessageType::Error, payload, room_id, SYSTEM_SENDER)
    }

    /// Recognized message type, if any
    #[must_use]
    pub fn kind(&self) -> Option<MessageType> {
        MessageType::parse(&self.message_type)
    }

    /// Decode the content into a typed payload
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.content)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut message: Self = serde_json::from_str(json)?;
        if message.content.is_null() {
            message.content = empty_object();
        }
        Ok(message)
    }
}

impl std::fmt::Display for WireMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WireMessage({} room={} user={})",
            self.message_type, self.room_id, self.user_id
        )
    }
}
