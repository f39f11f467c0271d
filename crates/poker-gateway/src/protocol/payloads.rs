//! Typed message contents
//!
//! Inbound payloads only name the fields the server acts on; anything else a
//! client sends (its own timestamp, username, ...) is ignored.

use poker_core::Participant;
use serde::{Deserialize, Serialize};

/// `new_story` content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStoryPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `start_voting` content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartVotingPayload {
    pub story_id: String,
}

/// `vote` content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotePayload {
    pub story_id: String,
    /// Scale value, or -1 for unknown
    pub value: i64,
}

/// `end_voting` content
///
/// A client-sent `final_score` is not read; the server computes the suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndVotingPayload {
    pub story_id: String,
}

/// Story reference inside `save_final_score`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryRef {
    pub id: String,
    pub final_score: i64,
}

/// `save_final_score` content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFinalScorePayload {
    pub story: StoryRef,
}

/// `profile_image_update` content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdatePayload {
    /// Target record; defaults to the sender
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Participant presence (`user_connected`, `existing_user`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPresencePayload {
    pub user_id: String,
    pub username: String,
    pub profile_image: Option<String>,
    pub is_guest: bool,
}

impl From<&Participant> for UserPresencePayload {
    fn from(participant: &Participant) -> Self {
        Self {
            user_id: participant.id.clone(),
            username: participant.username.clone(),
            profile_image: participant.profile_image.clone(),
            is_guest: participant.is_guest,
        }
    }
}

/// Private reply to a rejected action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    /// `message_type` of the rejected frame
    pub in_reply_to: Option<String>,
}

impl ErrorPayload {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        in_reply_to: Option<&str>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            in_reply_to: in_reply_to.map(str::to_string),
        }
    }
}
