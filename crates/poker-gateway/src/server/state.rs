//! Gateway state
//!
//! Shared state for the WebSocket and REST handlers.

use std::sync::Arc;

use poker_common::{AppConfig, JwtService};
use poker_service::{RoomStore, ServiceContext};

use crate::broadcast::BroadcastHub;
use crate::connection::SessionRegistry;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    /// Rooms, guests, history and token validation
    service_context: Arc<ServiceContext>,
    /// Live connections per room
    registry: Arc<SessionRegistry>,
    /// Fan-out over `registry`
    hub: BroadcastHub,
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        Self {
            service_context: Arc::new(service_context),
            hub: BroadcastHub::new(registry.clone()),
            registry,
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Live rooms
    pub fn rooms(&self) -> &RoomStore {
        self.service_context.rooms()
    }

    /// Token validation
    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }

    /// Get the session registry
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Get the broadcast hub
    pub fn hub(&self) -> &BroadcastHub {
        &self.hub
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("service_context", &self.service_context)
            .field("registry", &self.registry)
            .field("config", &"AppConfig")
            .finish()
    }
}
