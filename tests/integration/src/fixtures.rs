//! Test fixtures and data generators
//!
//! Request bodies and the subset of response fields the tests read.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A unique registered-user id
pub fn unique_user_id() -> String {
    format!("U{}", unique_suffix())
}

#[derive(Debug, Serialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

impl CreateRoomRequest {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JoinRoomRequest {
    pub invite_code: String,
}

#[derive(Debug, Serialize)]
pub struct GuestJoinRequest {
    pub username: String,
    pub room_code: String,
}

#[derive(Debug, Serialize)]
pub struct GuestCreateRequest {
    pub username: String,
    pub room_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantView {
    pub id: String,
    pub username: String,
    pub is_guest: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletedStoryView {
    pub story_id: String,
    pub title: String,
    pub final_score: u32,
}

/// Room as returned by the REST endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RoomView {
    pub id: String,
    pub name: String,
    pub invite_code: String,
    pub admin_id: String,
    pub participants: Vec<ParticipantView>,
    pub current_story: Option<serde_json::Value>,
    pub completed_stories: Vec<CompletedStoryView>,
}

impl RoomView {
    pub fn has_participant(&self, id: &str) -> bool {
        self.participants.iter().any(|p| p.id == id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuestSession {
    pub guest_id: String,
    pub username: String,
    pub room: RoomView,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
