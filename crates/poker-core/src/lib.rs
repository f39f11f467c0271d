//! # poker-core
//!
//! Domain layer containing room entities, the story state machine, value objects,
//! and the persistence port for completed stories.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AutoClose, CompletedStory, EmojiReaction, Participant, Room, Story, StoryState, Vote,
    MAX_EMOJI_LEN, MAX_ROOM_NAME_LEN,
};
pub use error::DomainError;
pub use traits::{CompletedStoryRepository, RepoResult};
pub use value_objects::{
    generate_invite_code, is_valid_invite_code, normalize_invite_code, now_millis, VoteValue,
    VoteValueError, ESTIMATION_SCALE, INVITE_CODE_LEN, UNKNOWN_SENTINEL,
};
