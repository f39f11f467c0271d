//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{guests, health, rooms};
use crate::server::GatewayState;

/// REST routes
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .merge(health_routes())
        .merge(room_routes())
        .merge(guest_routes())
}

/// Health check routes
pub fn health_routes() -> Router<GatewayState> {
    Router::new().route("/health", get(health::health_check))
}

fn room_routes() -> Router<GatewayState> {
    Router::new()
        .route("/rooms", post(rooms::create_room))
        .route("/rooms/join", post(rooms::join_room))
        .route("/rooms/:room_id", get(rooms::get_room))
        .route(
            "/rooms/:room_id/completed-stories",
            get(rooms::get_completed_stories),
        )
}

fn guest_routes() -> Router<GatewayState> {
    Router::new()
        .route("/guest/join", post(guests::guest_join))
        .route("/guest/create", post(guests::guest_create))
}
