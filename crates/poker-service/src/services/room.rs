//! Room service
//!
//! Use cases behind the REST bootstrap endpoints: creating and joining rooms,
//! guest onboarding, and reading room state and history.

use std::time::Duration;

use poker_core::{CompletedStory, Participant};
use tracing::{info, instrument};

use crate::dto::{
    CreateRoomRequest, GuestCreateRequest, GuestJoinRequest, GuestSessionResponse,
    JoinRoomRequest, RoomResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Room service
pub struct RoomService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoomService<'a> {
    /// Create a new RoomService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a room with the caller as admin
    #[instrument(skip(self, creator, request), fields(user_id = %creator.id))]
    pub fn create_room(
        &self,
        creator: Participant,
        request: CreateRoomRequest,
    ) -> ServiceResult<RoomResponse> {
        let room = self.ctx.rooms().create_room(&request.name, creator)?;
        Ok(RoomResponse::from(room))
    }

    /// Join a room through its invite code
    #[instrument(skip(self, participant, request), fields(user_id = %participant.id))]
    pub fn join_room(
        &self,
        participant: Participant,
        request: JoinRoomRequest,
    ) -> ServiceResult<RoomResponse> {
        let room = self
            .ctx
            .rooms()
            .join_by_invite_code(&request.invite_code, participant)?;
        Ok(RoomResponse::from(room))
    }

    /// Current room state; only participants may read it
    #[instrument(skip(self))]
    pub fn get_room(&self, room_id: &str, requester_id: &str) -> ServiceResult<RoomResponse> {
        let room = self.ctx.rooms().require(room_id)?.snapshot();
        if !room.is_participant(requester_id) {
            return Err(ServiceError::forbidden("not a participant of this room"));
        }
        Ok(RoomResponse::from(room))
    }

    /// Completed stories in completion order
    ///
    /// Live rooms answer from memory. Once a room is gone from memory the
    /// durable history is the only source left.
    #[instrument(skip(self))]
    pub async fn completed_stories(
        &self,
        room_id: &str,
        requester_id: &str,
    ) -> ServiceResult<Vec<CompletedStory>> {
        if let Some(handle) = self.ctx.rooms().get(room_id) {
            let room = handle.snapshot();
            if !room.is_participant(requester_id) {
                return Err(ServiceError::forbidden("not a participant of this room"));
            }
            return Ok(room.completed_stories);
        }

        let stored = self.ctx.history().find_by_room(room_id).await?;
        if stored.is_empty() {
            return Err(ServiceError::not_found("Room", room_id));
        }
        let voted = stored
            .iter()
            .any(|s| s.votes.iter().any(|v| v.user_id == requester_id));
        if !voted {
            return Err(ServiceError::forbidden("not a participant of this room"));
        }
        Ok(stored)
    }

    /// Evict rooms left without connections for `ttl`, with their guests
    ///
    /// Completed stories stay readable through the durable history.
    pub fn evict_idle_rooms(&self, ttl: Duration) -> usize {
        let evicted = self.ctx.rooms().evict_idle(ttl);
        for room in &evicted {
            self.ctx.guests().remove_room(&room.id);
        }
        evicted.len()
    }

    /// Issue a guest identity and join an existing room
    #[instrument(skip(self, request))]
    pub fn guest_join(&self, request: GuestJoinRequest) -> ServiceResult<GuestSessionResponse> {
        let username = request.username.trim();
        if username.is_empty() {
            return Err(ServiceError::validation("username is required"));
        }

        // Resolve the room first so a bad code issues nothing
        let handle = self
            .ctx
            .rooms()
            .find_by_invite_code(&request.room_code)
            .ok_or_else(|| ServiceError::not_found("Room", request.room_code.trim()))?;

        let guest = self.ctx.guests().issue(handle.id(), username);
        let room = self.ctx.rooms().join_room(
            handle.id(),
            Participant::guest(guest.guest_id.clone(), guest.username.clone()),
        )?;

        info!(guest_id = %guest.guest_id, room_id = %room.id, "Guest joined room");

        Ok(GuestSessionResponse {
            guest_id: guest.guest_id,
            username: guest.username,
            room: RoomResponse::from(room),
        })
    }

    /// Issue a guest identity and create a room with the guest as admin
    #[instrument(skip(self, request))]
    pub fn guest_create(
        &self,
        request: GuestCreateRequest,
    ) -> ServiceResult<GuestSessionResponse> {
        let username = request.username.trim();
        if username.is_empty() {
            return Err(ServiceError::validation("username is required"));
        }

        // The guest id must exist before the room so it can be the admin id
        let guest_id = uuid::Uuid::new_v4().to_string();
        let room = self.ctx.rooms().create_room(
            &request.room_name,
            Participant::guest(guest_id.clone(), username),
        )?;
        let guest = self.ctx.guests().register(guest_id, &room.id, username);

        info!(guest_id = %guest.guest_id, room_id = %room.id, "Guest created room");

        Ok(GuestSessionResponse {
            guest_id: guest.guest_id,
            username: guest.username,
            room: RoomResponse::from(room),
        })
    }
}
