//! Guest handlers
//!
//! Guests get an id scoped to one room and no token; the id is what they
//! present on the guest WebSocket route.

use axum::{extract::State, Json};
use poker_service::dto::{GuestCreateRequest, GuestJoinRequest, GuestSessionResponse};
use poker_service::RoomService;

use crate::api::extractors::ValidatedJson;
use crate::api::response::{ApiResult, Created};
use crate::server::GatewayState;

/// Join an existing room as a guest
///
/// POST /guest/join
pub async fn guest_join(
    State(state): State<GatewayState>,
    ValidatedJson(request): ValidatedJson<GuestJoinRequest>,
) -> ApiResult<Json<GuestSessionResponse>> {
    let service = RoomService::new(state.service_context());
    let session = service.guest_join(request)?;
    Ok(Json(session))
}

/// Create a room as a guest, who becomes its admin
///
/// POST /guest/create
pub async fn guest_create(
    State(state): State<GatewayState>,
    ValidatedJson(request): ValidatedJson<GuestCreateRequest>,
) -> ApiResult<Created<Json<GuestSessionResponse>>> {
    let service = RoomService::new(state.service_context());
    let session = service.guest_create(request)?;
    Ok(Created(Json(session)))
}
