//! Broadcast hub
//!
//! Delivers messages to every live connection in a room. Callers broadcast
//! while holding the room lock, which is what gives every recipient the same
//! relative order of room events.

use std::sync::Arc;

use crate::connection::{Connection, SendError, SessionRegistry};
use crate::protocol::WireMessage;

/// Fans messages out to registered connections
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    registry: Arc<SessionRegistry>,
}

impl BroadcastHub {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Send to every live connection in the room except `exclude_session`
    ///
    /// Returns the number of connections the message was queued for. A
    /// recipient whose queue is full is closed and skipped from then on.
    pub fn broadcast(
        &self,
        room_id: &str,
        message: &WireMessage,
        exclude_session: Option<&str>,
    ) -> usize {
        let mut delivered = 0;
        let mut dropped = 0;

        for connection in self.registry.room_connections(room_id) {
            if exclude_session == Some(connection.session_id()) {
                continue;
            }
            if self.deliver(&connection, message.clone()) {
                delivered += 1;
            } else {
                dropped += 1;
            }
        }

        tracing::trace!(
            room_id = %room_id,
            message_type = %message.message_type,
            delivered,
            dropped,
            "Broadcast to room"
        );

        delivered
    }

    /// Send privately to one connection
    pub fn send_to(&self, connection: &Connection, message: WireMessage) -> bool {
        self.deliver(connection, message)
    }

    fn deliver(&self, connection: &Connection, message: WireMessage) -> bool {
        match connection.try_send(message) {
            Ok(()) => true,
            Err(SendError::Full) => {
                tracing::warn!(
                    session_id = %connection.session_id(),
                    room_id = %connection.room_id(),
                    user_id = %connection.participant_id(),
                    "Outbound queue full, closing slow connection"
                );
                false
            }
            Err(SendError::Closed) => false,
        }
    }
}
