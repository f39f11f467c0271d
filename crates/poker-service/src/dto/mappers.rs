//! Entity to DTO mappers

use poker_core::{Participant, Room, Story};

use super::responses::{ParticipantResponse, RoomResponse, StoryResponse};

impl From<&Participant> for ParticipantResponse {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id.clone(),
            username: p.username.clone(),
            profile_image: p.profile_image.clone(),
            is_guest: p.is_guest,
        }
    }
}

impl From<&Story> for StoryResponse {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id.clone(),
            room_id: story.room_id.clone(),
            title: story.title.clone(),
            description: story.description.clone(),
            votes: story.votes.clone(),
            final_score: story.final_score,
            state: story.state,
        }
    }
}

impl From<&Room> for RoomResponse {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            name: room.name.clone(),
            invite_code: room.invite_code.clone(),
            admin_id: room.admin_id.clone(),
            participants: room.participants.iter().map(ParticipantResponse::from).collect(),
            current_story: room.current_story().map(StoryResponse::from),
            stories: room.stories.iter().map(StoryResponse::from).collect(),
            completed_stories: room.completed_stories.clone(),
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self::from(&room)
    }
}
