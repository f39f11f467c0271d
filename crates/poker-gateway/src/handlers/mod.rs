//! Inbound event handlers
//!
//! Every accepted frame is applied while holding its room's lock, and the
//! broadcasts it causes are queued before the lock is released.

mod error;
mod presence;
mod profile;
mod reaction;
mod story;
mod voting;

pub use error::{HandlerError, HandlerResult};
pub use presence::PresenceHandler;
pub use profile::ProfileHandler;
pub use reaction::ReactionHandler;
pub use story::StoryHandler;
pub use voting::VotingHandler;

use crate::connection::Connection;
use crate::protocol::{MessageType, WireMessage};
use crate::server::GatewayState;

/// Routes inbound frames to their handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Apply a frame, answering the sender privately if it is rejected
    pub fn handle(state: &GatewayState, connection: &Connection, message: &WireMessage) {
        if let Err(e) = Self::dispatch(state, connection, message) {
            tracing::debug!(
                session_id = %connection.session_id(),
                room_id = %connection.room_id(),
                user_id = %connection.participant_id(),
                message_type = %message.message_type,
                error = %e,
                "Event rejected"
            );

            let reply = WireMessage::error(
                connection.room_id(),
                &e.to_payload(Some(&message.message_type)),
            );
            state.hub().send_to(connection, reply);
        }
    }

    /// Apply a frame against the connection's room
    ///
    /// Unknown and server-only message types are dropped without a reply.
    pub fn dispatch(
        state: &GatewayState,
        connection: &Connection,
        message: &WireMessage,
    ) -> HandlerResult<()> {
        let Some(kind) = message.kind().filter(|k| k.is_client_type()) else {
            tracing::debug!(
                session_id = %connection.session_id(),
                message_type = %message.message_type,
                "Dropping unsupported message type"
            );
            return Ok(());
        };

        if !message.room_id.is_empty() && message.room_id != connection.room_id() {
            return Err(HandlerError::RoomMismatch {
                expected: connection.room_id().to_string(),
                actual: message.room_id.clone(),
            });
        }

        let handle = state.rooms().require(connection.room_id())?;
        let mut room = handle.lock();

        tracing::trace!(
            session_id = %connection.session_id(),
            room_id = %room.id,
            message_type = %kind,
            "Applying event"
        );

        match kind {
            MessageType::NewStory => {
                StoryHandler::new_story(state, connection, &mut room, message.payload()?)
            }
            MessageType::StartVoting => {
                StoryHandler::start_voting(state, connection, &mut room, message.payload()?)
            }
            MessageType::Vote => {
                VotingHandler::vote(state, connection, &mut room, message.payload()?)
            }
            MessageType::EndVoting => {
                VotingHandler::end_voting(state, connection, &mut room, message.payload()?)
            }
            MessageType::SaveFinalScore => {
                StoryHandler::save_final_score(state, connection, &mut room, message.payload()?)
            }
            MessageType::EmojiReaction => {
                ReactionHandler::handle(state, connection, &room, message.payload()?)
            }
            MessageType::ProfileImageUpdate => {
                ProfileHandler::handle(state, connection, &mut room, message.payload()?)
            }
            // Filtered out by is_client_type above
            MessageType::CompletedStory
            | MessageType::UserConnected
            | MessageType::UserDisconnected
            | MessageType::ExistingUser
            | MessageType::RoomState
            | MessageType::Error => Ok(()),
        }
    }
}
