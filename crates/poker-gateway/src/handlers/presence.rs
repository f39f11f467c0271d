//! Connection presence: registering into a room and leaving it

use std::sync::Arc;

use poker_core::{now_millis, DomainError, Participant};
use poker_service::dto::RoomResponse;
use serde_json::json;

use super::VotingHandler;
use crate::connection::Connection;
use crate::protocol::{MessageType, UserPresencePayload, WireMessage};
use crate::server::GatewayState;

/// Handles room presence
pub struct PresenceHandler;

impl PresenceHandler {
    /// Register a connection in its room
    ///
    /// Returns the greeting for the new connection: the room state and one
    /// `existing_user` per other connected participant. The socket writer
    /// sends it ahead of anything queued and outside the outbound buffer.
    /// The whole room, the new connection included, then receives
    /// `user_connected`.
    pub fn join(
        state: &GatewayState,
        connection: &Arc<Connection>,
        participant: Participant,
    ) -> Result<Vec<WireMessage>, DomainError> {
        let handle = state.rooms().require(connection.room_id())?;
        let mut room = handle.lock();
        handle.occupy()?;

        room.join(participant, now_millis());
        let others = state.registry().active_participants(&room.id);
        state.registry().register(connection.clone());

        let mut greeting = Vec::with_capacity(others.len() + 1);
        greeting.push(WireMessage::from_payload(
            MessageType::RoomState,
            &RoomResponse::from(&*room),
            &room.id,
            connection.participant_id(),
        ));
        greeting.extend(
            room.participants
                .iter()
                .filter(|p| others.contains(&p.id) && p.id != connection.participant_id())
                .map(|participant| {
                    WireMessage::from_payload(
                        MessageType::ExistingUser,
                        &UserPresencePayload::from(participant),
                        &room.id,
                        &participant.id,
                    )
                }),
        );

        if let Some(me) = room.participant(connection.participant_id()) {
            let message = WireMessage::from_payload(
                MessageType::UserConnected,
                &UserPresencePayload::from(me),
                &room.id,
                &me.id,
            );
            state.hub().broadcast(&room.id, &message, None);
        }

        tracing::info!(
            session_id = %connection.session_id(),
            room_id = %room.id,
            user_id = %connection.participant_id(),
            is_guest = connection.is_guest(),
            other_tabs = others.contains(connection.participant_id()),
            "Participant connected"
        );

        Ok(greeting)
    }

    /// Unregister a connection
    ///
    /// `user_disconnected` goes out only when the participant's last
    /// connection leaves. A departure can complete an open round, so the
    /// auto-close check runs afterwards.
    pub fn leave(state: &GatewayState, connection: &Connection) {
        let Some(handle) = state.rooms().get(connection.room_id()) else {
            state.registry().unregister(connection.session_id());
            return;
        };
        let mut room = handle.lock();

        if state.registry().unregister(connection.session_id()).is_none() {
            return;
        }
        if !state.registry().has_connections(&room.id) {
            handle.vacate();
        }

        let participant_id = connection.participant_id();
        if state
            .registry()
            .has_other_connection(&room.id, participant_id, connection.session_id())
        {
            tracing::debug!(
                session_id = %connection.session_id(),
                room_id = %room.id,
                user_id = %participant_id,
                "Connection closed, participant still connected elsewhere"
            );
            return;
        }

        let message = WireMessage::new(
            MessageType::UserDisconnected,
            json!({ "user_id": participant_id }),
            &room.id,
            participant_id,
        );
        state.hub().broadcast(&room.id, &message, None);

        tracing::info!(
            session_id = %connection.session_id(),
            room_id = %room.id,
            user_id = %participant_id,
            "Participant disconnected"
        );

        VotingHandler::auto_close(state, &mut room);
    }
}
