//! Handler error types

use poker_core::DomainError;
use thiserror::Error;

use crate::protocol::ErrorPayload;

/// Why an inbound event was rejected
///
/// Every variant is recoverable: the room is left unchanged and only the
/// sender hears about it.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Content does not have the shape the message type needs
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Frame addressed to a room other than the connection's
    #[error("Connection is bound to room {expected}, frame names {actual}")]
    RoomMismatch { expected: String, actual: String },

    /// Rejected by the room
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl HandlerError {
    /// Code sent in the error frame
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) | Self::RoomMismatch { .. } => "PROTOCOL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Build the private error frame content
    pub fn to_payload(&self, in_reply_to: Option<&str>) -> ErrorPayload {
        ErrorPayload::new(self.error_code(), self.to_string(), in_reply_to)
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
