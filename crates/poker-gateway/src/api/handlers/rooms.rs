//! Room handlers
//!
//! Endpoints for creating, joining and reading rooms.

use axum::{
    extract::{Path, State},
    Json,
};
use poker_core::CompletedStory;
use poker_service::dto::{CreateRoomRequest, JoinRoomRequest, RoomResponse};
use poker_service::RoomService;

use crate::api::extractors::{AuthUser, Requester, ValidatedJson};
use crate::api::response::{ApiResult, Created};
use crate::server::GatewayState;

/// Create a room with the caller as admin
///
/// POST /rooms
pub async fn create_room(
    State(state): State<GatewayState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> ApiResult<Created<Json<RoomResponse>>> {
    let service = RoomService::new(state.service_context());
    let room = service.create_room(auth.participant(), request)?;
    Ok(Created(Json(room)))
}

/// Join a room by invite code
///
/// POST /rooms/join
pub async fn join_room(
    State(state): State<GatewayState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<JoinRoomRequest>,
) -> ApiResult<Json<RoomResponse>> {
    let service = RoomService::new(state.service_context());
    let room = service.join_room(auth.participant(), request)?;
    Ok(Json(room))
}

/// Current room state
///
/// GET /rooms/{room_id}
pub async fn get_room(
    State(state): State<GatewayState>,
    requester: Requester,
    Path(room_id): Path<String>,
) -> ApiResult<Json<RoomResponse>> {
    let service = RoomService::new(state.service_context());
    let room = service.get_room(&room_id, &requester.id)?;
    Ok(Json(room))
}

/// Finalized stories in completion order
///
/// GET /rooms/{room_id}/completed-stories
pub async fn get_completed_stories(
    State(state): State<GatewayState>,
    requester: Requester,
    Path(room_id): Path<String>,
) -> ApiResult<Json<Vec<CompletedStory>>> {
    let service = RoomService::new(state.service_context());
    let stories = service.completed_stories(&room_id, &requester.id).await?;
    Ok(Json(stories))
}
