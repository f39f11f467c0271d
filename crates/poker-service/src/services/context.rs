//! Service context - dependency container shared by REST and WebSocket handlers

use std::sync::Arc;

use poker_common::auth::JwtService;
use poker_core::CompletedStoryRepository;

use super::guest::GuestDirectory;
use super::persistence::PersistenceQueue;
use super::room_store::RoomStore;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    rooms: Arc<RoomStore>,
    guests: Arc<GuestDirectory>,
    history: Arc<dyn CompletedStoryRepository>,
    persistence: PersistenceQueue,
    jwt_service: Arc<JwtService>,
}

impl ServiceContext {
    /// Create a new service context
    ///
    /// `persistence` should write into the same repository as `history`.
    pub fn new(
        history: Arc<dyn CompletedStoryRepository>,
        persistence: PersistenceQueue,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            rooms: Arc::new(RoomStore::new()),
            guests: Arc::new(GuestDirectory::new()),
            history,
            persistence,
            jwt_service,
        }
    }

    /// Live rooms
    pub fn rooms(&self) -> &RoomStore {
        &self.rooms
    }

    /// Issued guest identities
    pub fn guests(&self) -> &GuestDirectory {
        &self.guests
    }

    /// Durable completed story history
    pub fn history(&self) -> &Arc<dyn CompletedStoryRepository> {
        &self.history
    }

    /// Queue for writing finalized stories
    pub fn persistence(&self) -> &PersistenceQueue {
        &self.persistence
    }

    /// Token validation
    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("rooms", &self.rooms.len())
            .field("guests", &self.guests.len())
            .finish_non_exhaustive()
    }
}
