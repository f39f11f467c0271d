//! Voting events: `vote`, `end_voting`, and the server-side auto-close

use poker_core::{now_millis, Room};
use serde_json::json;

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::{EndVotingPayload, MessageType, VotePayload, WireMessage, SYSTEM_SENDER};
use crate::server::GatewayState;

/// Handles voting events
pub struct VotingHandler;

impl VotingHandler {
    /// Record a vote, then close the round if everyone present has voted
    pub fn vote(
        state: &GatewayState,
        connection: &Connection,
        room: &mut Room,
        payload: VotePayload,
    ) -> HandlerResult<()> {
        let vote = room.submit_vote(
            connection.participant_id(),
            &payload.story_id,
            payload.value,
            now_millis(),
        )?;

        tracing::debug!(
            room_id = %room.id,
            story_id = %payload.story_id,
            user_id = %vote.user_id,
            "Vote recorded"
        );

        let message = WireMessage::new(
            MessageType::Vote,
            json!({
                "story_id": payload.story_id,
                "value": vote.value,
                "timestamp": vote.timestamp,
                "username": vote.username,
                "profile_image": vote.profile_image,
            }),
            &room.id,
            &vote.user_id,
        );
        state.hub().broadcast(&room.id, &message, None);

        Self::auto_close(state, room);
        Ok(())
    }

    /// Manually close voting (admin override)
    pub fn end_voting(
        state: &GatewayState,
        connection: &Connection,
        room: &mut Room,
        payload: EndVotingPayload,
    ) -> HandlerResult<()> {
        let suggestion =
            room.close_voting(connection.participant_id(), &payload.story_id, now_millis())?;

        tracing::info!(
            room_id = %room.id,
            story_id = %payload.story_id,
            suggestion = ?suggestion,
            "Voting closed"
        );

        let message = Self::results_message(
            room,
            &payload.story_id,
            suggestion,
            connection.participant_id(),
        );
        state.hub().broadcast(&room.id, &message, None);
        Ok(())
    }

    /// Close the open round if every active participant has voted
    ///
    /// Returns `true` if the round was closed. Does nothing when no one is
    /// connected.
    pub fn auto_close(state: &GatewayState, room: &mut Room) -> bool {
        let active = state.registry().active_participants(&room.id);
        let Some(closed) = room.auto_close_if_complete(&active, now_millis()) else {
            return false;
        };

        tracing::info!(
            room_id = %room.id,
            story_id = %closed.story_id,
            suggestion = ?closed.suggestion,
            active = active.len(),
            "Voting closed automatically"
        );

        let message =
            Self::results_message(room, &closed.story_id, closed.suggestion, SYSTEM_SENDER);
        state.hub().broadcast(&room.id, &message, None);
        true
    }

    /// `end_voting` broadcast revealing the votes and the suggestion
    fn results_message(
        room: &Room,
        story_id: &str,
        suggestion: Option<u8>,
        sender: &str,
    ) -> WireMessage {
        let votes = room
            .story(story_id)
            .map(|s| s.votes.clone())
            .unwrap_or_default();

        WireMessage::new(
            MessageType::EndVoting,
            json!({
                "story_id": story_id,
                "final_score": suggestion,
                "votes": votes,
            }),
            &room.id,
            sender,
        )
    }
}
