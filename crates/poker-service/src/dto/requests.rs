//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Room Requests
// ============================================================================

/// Create room request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 100, message = "Room name must be 1-100 characters"))]
    pub name: String,
}

/// Join room by invite code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JoinRoomRequest {
    #[validate(length(min = 1, max = 16, message = "Invite code is required"))]
    pub invite_code: String,
}

// ============================================================================
// Guest Requests
// ============================================================================

/// Join an existing room as a guest
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GuestJoinRequest {
    #[validate(length(min = 1, max = 32, message = "Username must be 1-32 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 16, message = "Room code is required"))]
    pub room_code: String,
}

/// Create a room as a guest (the guest becomes admin)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GuestCreateRequest {
    #[validate(length(min = 1, max = 32, message = "Username must be 1-32 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 100, message = "Room name must be 1-100 characters"))]
    pub room_name: String,
}
