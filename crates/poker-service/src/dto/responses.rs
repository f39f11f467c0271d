//! Response DTOs for API endpoints

use serde::Serialize;

use poker_core::{CompletedStory, StoryState, Vote};

/// Participant as shown to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantResponse {
    pub id: String,
    pub username: String,
    pub profile_image: Option<String>,
    pub is_guest: bool,
}

/// Story as shown to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryResponse {
    pub id: String,
    pub room_id: String,
    pub title: String,
    pub description: Option<String>,
    pub votes: Vec<Vote>,
    pub final_score: Option<u32>,
    pub state: StoryState,
}

/// Full room view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub invite_code: String,
    pub admin_id: String,
    pub participants: Vec<ParticipantResponse>,
    pub current_story: Option<StoryResponse>,
    pub stories: Vec<StoryResponse>,
    pub completed_stories: Vec<CompletedStory>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Issued guest identity plus the room it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct GuestSessionResponse {
    pub guest_id: String,
    pub username: String,
    pub room: RoomResponse,
}

/// Liveness probe body
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub rooms: usize,
}
