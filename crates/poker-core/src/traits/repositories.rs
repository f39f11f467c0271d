//! Repository traits (ports) - define the interface for data access
//!
//! Live room state is held in memory; only finalized stories are written to
//! durable storage. The infrastructure layer provides the implementation.

use async_trait::async_trait;

use crate::entities::CompletedStory;
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Completed Story Repository
// ============================================================================

#[async_trait]
pub trait CompletedStoryRepository: Send + Sync {
    /// Persist a completed story snapshot
    ///
    /// Saving the same `(room_id, story_id)` twice must be a no-op so that
    /// retried saves stay idempotent.
    async fn save(&self, story: &CompletedStory) -> RepoResult<()>;

    /// All completed stories for a room, in completion order
    async fn find_by_room(&self, room_id: &str) -> RepoResult<Vec<CompletedStory>>;
}
