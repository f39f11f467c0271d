//! Server setup
//!
//! Wires the REST and WebSocket routes, builds shared state and serves.

mod handler;
mod reaper;
mod state;

pub use handler::{guest_ws_handler, room_ws_handler};
pub use reaper::spawn_room_reaper;
pub use state::GatewayState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use poker_common::{AppConfig, AppError, JwtService};
use poker_core::CompletedStoryRepository;
use poker_service::{PersistenceQueue, RetryPolicy, ServiceContext};
use tokio::net::TcpListener;

use crate::api::{middleware::apply_middleware, routes};

/// Create the full router: REST endpoints plus the two WebSocket routes
pub fn create_router() -> Router<GatewayState> {
    routes::create_router()
        .route("/rooms/:room_id/ws", get(room_ws_handler))
        .route("/rooms/:room_id/guest-ws/:guest_id", get(guest_ws_handler))
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    let is_production = state.config().app.env.is_production();
    let cors = state.config().cors.clone();

    apply_middleware(create_router(), &cors, is_production).with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
///
/// Completed stories go to PostgreSQL when `DATABASE_URL` is set, otherwise
/// to an in-memory store. Also starts the idle room reaper.
pub async fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    let history: Arc<dyn CompletedStoryRepository> = match &config.database {
        Some(database) => {
            tracing::info!("Connecting to PostgreSQL...");
            let pool = poker_db::create_pool(&poker_db::DatabaseConfig::from(database))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            poker_db::ensure_schema(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            tracing::info!("PostgreSQL connection established");

            Arc::new(poker_db::PgCompletedStoryRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, completed stories are kept in memory");
            Arc::new(poker_db::InMemoryCompletedStoryRepository::new())
        }
    };

    let (persistence, _worker) =
        PersistenceQueue::spawn(history.clone(), RetryPolicy::from(&config.persistence));

    let jwt_service = Arc::new(JwtService::new(&config.jwt.secret));
    let service_context = ServiceContext::new(history, persistence, jwt_service);

    let state = GatewayState::new(service_context, config);
    spawn_room_reaper(state.clone());

    Ok(state)
}

/// Serve an application on an already bound listener
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the server on `addr`
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Listening on http://{}", addr);

    serve(listener, app).await
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {e}")))?;

    let state = create_gateway_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
