//! `profile_image_update`: a participant changing their own name or picture

use poker_core::{now_millis, Room};
use serde_json::json;

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::{MessageType, ProfileUpdatePayload, WireMessage};
use crate::server::GatewayState;

pub struct ProfileHandler;

impl ProfileHandler {
    pub fn handle(
        state: &GatewayState,
        connection: &Connection,
        room: &mut Room,
        payload: ProfileUpdatePayload,
    ) -> HandlerResult<()> {
        let sender = connection.participant_id();
        let target = payload.user_id.as_deref().unwrap_or(sender);

        let updated = room.update_profile(
            sender,
            target,
            payload.username,
            payload.profile_image,
            now_millis(),
        )?;

        tracing::debug!(room_id = %room.id, user_id = %updated.id, "Profile updated");

        let message = WireMessage::new(
            MessageType::ProfileImageUpdate,
            json!({
                "user_id": updated.id,
                "username": updated.username,
                "profile_image": updated.profile_image,
            }),
            &room.id,
            sender,
        );
        state.hub().broadcast(&room.id, &message, None);
        Ok(())
    }
}
