//! Session registry
//!
//! Maps every live connection to its room and participant. Callers mutate a
//! room's entries only while holding that room's lock, so presence changes
//! are ordered with the room's other events.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;

use super::Connection;

/// Registry of live room connections
#[derive(Debug, Default)]
pub struct SessionRegistry {
    /// Connections by session ID
    connections: DashMap<String, Arc<Connection>>,

    /// Room ID to session IDs mapping
    room_connections: DashMap<String, HashSet<String>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection under its room
    pub fn register(&self, connection: Arc<Connection>) {
        let session_id = connection.session_id().to_string();

        self.room_connections
            .entry(connection.room_id().to_string())
            .or_default()
            .insert(session_id.clone());

        tracing::debug!(
            session_id = %session_id,
            room_id = %connection.room_id(),
            user_id = %connection.participant_id(),
            "Connection registered"
        );

        self.connections.insert(session_id, connection);
    }

    /// Remove a connection, returning it if it was registered
    pub fn unregister(&self, session_id: &str) -> Option<Arc<Connection>> {
        let (_, connection) = self.connections.remove(session_id)?;

        self.room_connections
            .alter(connection.room_id(), |_, mut sessions| {
                sessions.remove(session_id);
                sessions
            });
        self.room_connections
            .remove_if(connection.room_id(), |_, sessions| sessions.is_empty());

        tracing::debug!(
            session_id = %session_id,
            room_id = %connection.room_id(),
            "Connection unregistered"
        );

        Some(connection)
    }

    /// Every registered connection in a room, closed ones included
    fn registered_in(&self, room_id: &str) -> Vec<Arc<Connection>> {
        self.room_connections
            .get(room_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| self.connections.get(sid).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Connections in a room that still take deliveries
    pub fn room_connections(&self, room_id: &str) -> Vec<Arc<Connection>> {
        let mut connections = self.registered_in(room_id);
        connections.retain(|c| !c.is_closed());
        connections
    }

    /// Participants with at least one live connection to the room
    pub fn active_participants(&self, room_id: &str) -> HashSet<String> {
        self.room_connections(room_id)
            .iter()
            .map(|c| c.participant_id().to_string())
            .collect()
    }

    /// Check if a participant still has a registered connection other than
    /// `except_session`
    ///
    /// Closed connections count until they are unregistered, so a participant
    /// is reported gone exactly once.
    pub fn has_other_connection(
        &self,
        room_id: &str,
        participant_id: &str,
        except_session: &str,
    ) -> bool {
        self.registered_in(room_id)
            .iter()
            .any(|c| c.participant_id() == participant_id && c.session_id() != except_session)
    }

    /// Check if a room has any registered connection, closed ones included
    pub fn has_connections(&self, room_id: &str) -> bool {
        self.room_connections.contains_key(room_id)
    }

    /// Total registered connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Rooms with at least one registered connection
    pub fn room_count(&self) -> usize {
        self.room_connections.len()
    }
}
