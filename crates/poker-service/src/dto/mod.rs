//! Data transfer objects for the REST surface

mod mappers;
mod requests;
mod responses;

pub use requests::{CreateRoomRequest, GuestCreateRequest, GuestJoinRequest, JoinRoomRequest};
pub use responses::{
    GuestSessionResponse, HealthResponse, ParticipantResponse, RoomResponse, StoryResponse,
};
