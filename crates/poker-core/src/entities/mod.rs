//! Domain entities - core business objects

mod completed_story;
mod participant;
mod reaction;
mod room;
mod story;
mod vote;

pub use completed_story::CompletedStory;
pub use participant::Participant;
pub use reaction::{EmojiReaction, MAX_EMOJI_LEN};
pub use room::{AutoClose, Room, MAX_ROOM_NAME_LEN};
pub use story::{Story, StoryState};
pub use vote::Vote;
