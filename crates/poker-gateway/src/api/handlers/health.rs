//! Health check handler

use axum::{extract::State, Json};
use poker_service::dto::HealthResponse;

use crate::server::GatewayState;

/// Liveness probe
///
/// GET /health
pub async fn health_check(State(state): State<GatewayState>) -> Json<HealthResponse> {
    tracing::trace!(
        connections = state.registry().connection_count(),
        "Health check"
    );

    Json(HealthResponse {
        status: "ok",
        rooms: state.rooms().len(),
    })
}
