//! `emoji_reaction` relay
//!
//! Reactions carry no room state. They are checked, stamped with the sender
//! and passed on to everyone except the sending connection.

use poker_core::{now_millis, DomainError, EmojiReaction, Room};

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::{MessageType, WireMessage};
use crate::server::GatewayState;

pub struct ReactionHandler;

impl ReactionHandler {
    pub fn handle(
        state: &GatewayState,
        connection: &Connection,
        room: &Room,
        mut reaction: EmojiReaction,
    ) -> HandlerResult<()> {
        reaction.validate()?;
        if !room.is_participant(&reaction.to_user_id) {
            return Err(DomainError::ParticipantNotFound(reaction.to_user_id).into());
        }

        reaction.from_user_id = connection.participant_id().to_string();
        reaction.timestamp = now_millis();

        let message = WireMessage::from_payload(
            MessageType::EmojiReaction,
            &reaction,
            &room.id,
            connection.participant_id(),
        );
        let delivered = state
            .hub()
            .broadcast(&room.id, &message, Some(connection.session_id()));

        tracing::trace!(
            room_id = %room.id,
            from = %reaction.from_user_id,
            to = %reaction.to_user_id,
            delivered,
            "Reaction relayed"
        );

        Ok(())
    }
}
