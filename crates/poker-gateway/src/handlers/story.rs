//! Story lifecycle events: `new_story`, `start_voting`, `save_final_score`

use poker_core::{now_millis, Room};
use poker_service::dto::StoryResponse;
use serde_json::json;

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::{
    MessageType, NewStoryPayload, SaveFinalScorePayload, StartVotingPayload, WireMessage,
    SYSTEM_SENDER,
};
use crate::server::GatewayState;

/// Handles story lifecycle events
pub struct StoryHandler;

impl StoryHandler {
    /// Start a story and announce it to the room
    pub fn new_story(
        state: &GatewayState,
        connection: &Connection,
        room: &mut Room,
        payload: NewStoryPayload,
    ) -> HandlerResult<()> {
        let story = room.start_story(
            connection.participant_id(),
            uuid::Uuid::new_v4().to_string(),
            &payload.title,
            payload.description,
            now_millis(),
        )?;

        tracing::info!(
            room_id = %room.id,
            story_id = %story.id,
            user_id = %connection.participant_id(),
            "Story created"
        );

        let message = WireMessage::from_payload(
            MessageType::NewStory,
            &StoryResponse::from(&story),
            &room.id,
            connection.participant_id(),
        );
        state.hub().broadcast(&room.id, &message, None);
        Ok(())
    }

    /// Open (or re-open) voting on the current story
    pub fn start_voting(
        state: &GatewayState,
        connection: &Connection,
        room: &mut Room,
        payload: StartVotingPayload,
    ) -> HandlerResult<()> {
        room.open_voting(connection.participant_id(), &payload.story_id, now_millis())?;

        tracing::info!(
            room_id = %room.id,
            story_id = %payload.story_id,
            "Voting opened"
        );

        let message = WireMessage::new(
            MessageType::StartVoting,
            json!({ "story_id": payload.story_id }),
            &room.id,
            connection.participant_id(),
        );
        state.hub().broadcast(&room.id, &message, None);
        Ok(())
    }

    /// Record the agreed score and move the story into history
    ///
    /// Persistence is queued; the room's in-memory history is already updated
    /// when this returns.
    pub fn save_final_score(
        state: &GatewayState,
        connection: &Connection,
        room: &mut Room,
        payload: SaveFinalScorePayload,
    ) -> HandlerResult<()> {
        let completed = room.finalize_story(
            connection.participant_id(),
            &payload.story.id,
            payload.story.final_score,
            now_millis(),
        )?;

        tracing::info!(
            room_id = %room.id,
            story_id = %completed.story_id,
            final_score = completed.final_score,
            "Story finalized"
        );

        let saved = WireMessage::new(
            MessageType::SaveFinalScore,
            json!({
                "story_id": completed.story_id,
                "final_score": completed.final_score,
            }),
            &room.id,
            connection.participant_id(),
        );
        state.hub().broadcast(&room.id, &saved, None);

        let snapshot = WireMessage::from_payload(
            MessageType::CompletedStory,
            &completed,
            &room.id,
            SYSTEM_SENDER,
        );
        state.hub().broadcast(&room.id, &snapshot, None);

        state.service_context().persistence().enqueue(completed);
        Ok(())
    }
}
