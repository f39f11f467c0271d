//! Room session protocol
//!
//! Message envelope, message types, typed payloads and close codes.

mod close_codes;
mod message_types;
mod messages;
mod payloads;

pub use close_codes::CloseCode;
pub use message_types::MessageType;
pub use messages::{WireMessage, SYSTEM_SENDER};
pub use payloads::{
    EndVotingPayload, ErrorPayload, NewStoryPayload, ProfileUpdatePayload, SaveFinalScorePayload,
    StartVotingPayload, StoryRef, UserPresencePayload, VotePayload,
};
