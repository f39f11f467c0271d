//! Emoji reactions - relayed between participants, never stored

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Maximum emoji length in characters
pub const MAX_EMOJI_LEN: usize = 16;

/// An emoji thrown from one participant at another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmojiReaction {
    pub emoji: String,
    #[serde(default)]
    pub from_user_id: String,
    pub to_user_id: String,
    #[serde(default)]
    pub timestamp: i64,
}

impl EmojiReaction {
    /// Validate the emoji payload
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.emoji.trim().is_empty() {
            return Err(DomainError::ValidationError("emoji is required".to_string()));
        }
        if self.emoji.chars().count() > MAX_EMOJI_LEN {
            return Err(DomainError::ValidationError(format!(
                "emoji must be at most {MAX_EMOJI_LEN} characters"
            )));
        }
        if self.to_user_id.is_empty() {
            return Err(DomainError::ValidationError("toUserId is required".to_string()));
        }
        Ok(())
    }
}
