//! Message types carried in the `message_type` field

use serde::{Deserialize, Serialize};

/// Every message type that can appear on a room connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    // Client and server
    NewStory,
    StartVoting,
    Vote,
    EndVoting,
    SaveFinalScore,
    EmojiReaction,
    ProfileImageUpdate,

    // Server only
    CompletedStory,
    UserConnected,
    UserDisconnected,
    ExistingUser,
    RoomState,
    Error,
}

impl MessageType {
    /// Parse a wire name, `None` for anything unrecognized
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new_story" => Some(Self::NewStory),
            "start_voting" => Some(Self::StartVoting),
            "vote" => Some(Self::Vote),
            "end_voting" => Some(Self::EndVoting),
            "save_final_score" => Some(Self::SaveFinalScore),
            "emoji_reaction" => Some(Self::EmojiReaction),
            "profile_image_update" => Some(Self::ProfileImageUpdate),
            "completed_story" => Some(Self::CompletedStory),
            "user_connected" => Some(Self::UserConnected),
            "user_disconnected" => Some(Self::UserDisconnected),
            "existing_user" => Some(Self::ExistingUser),
            "room_state" => Some(Self::RoomState),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewStory => "new_story",
            Self::StartVoting => "start_voting",
            Self::Vote => "vote",
            Self::EndVoting => "end_voting",
            Self::SaveFinalScore => "save_final_score",
            Self::EmojiReaction => "emoji_reaction",
            Self::ProfileImageUpdate => "profile_image_update",
            Self::CompletedStory => "completed_story",
            Self::UserConnected => "user_connected",
            Self::UserDisconnected => "user_disconnected",
            Self::ExistingUser => "existing_user",
            Self::RoomState => "room_state",
            Self::Error => "error",
        }
    }

    /// Check if clients are allowed to send this type
    #[must_use]
    pub const fn is_client_type(self) -> bool {
        matches!(
            self,
            Self::NewStory
                | Self::StartVoting
                | Self::Vote
                | Self::EndVoting
                | Self::SaveFinalScore
                | Self::EmojiReaction
                | Self::ProfileImageUpdate
        )
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
