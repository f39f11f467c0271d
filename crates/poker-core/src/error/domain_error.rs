//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
///
/// Every variant falls into one of the room protocol's error classes
/// (validation, permission, not found, conflict, protocol) or is an
/// infrastructure failure surfaced by a repository adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("No room for invite code: {0}")]
    InviteCodeNotFound(String),

    #[error("Story not found: {0}")]
    StoryNotFound(String),

    #[error("Participant not found in room: {0}")]
    ParticipantNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid vote value: {0}")]
    InvalidVoteValue(i64),

    #[error("Invalid final score: {0}")]
    InvalidFinalScore(i64),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only the room admin can {0}")]
    NotRoomAdmin(&'static str),

    #[error("Cannot act on behalf of another participant")]
    NotOwnRecord,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Room already has an active story")]
    StoryAlreadyActive,

    #[error("Voting is already open for this story")]
    VotingAlreadyOpen,

    #[error("Voting is not open for this story")]
    VotingNotOpen,

    #[error("Story results are not shown yet")]
    ResultsNotShown,

    #[error("Story is already finalized")]
    StoryAlreadyFinalized,

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses and error frames
    pub fn code(&self) -> &'static str {
        if self.is_not_found() {
            "NOT_FOUND"
        } else if self.is_validation() {
            "VALIDATION_ERROR"
        } else if self.is_authorization() {
            "PERMISSION_DENIED"
        } else if self.is_conflict() {
            "CONFLICT"
        } else if self.is_protocol() {
            "PROTOCOL_ERROR"
        } else {
            match self {
                Self::DatabaseError(_) => "DATABASE_ERROR",
                _ => "INTERNAL_ERROR",
            }
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RoomNotFound(_)
                | Self::InviteCodeNotFound(_)
                | Self::StoryNotFound(_)
                | Self::ParticipantNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidVoteValue(_) | Self::InvalidFinalScore(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotRoomAdmin(_) | Self::NotOwnRecord)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::StoryAlreadyActive
                | Self::VotingAlreadyOpen
                | Self::VotingNotOpen
                | Self::ResultsNotShown
                | Self::StoryAlreadyFinalized
        )
    }

    /// Check if this is a protocol error
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::ProtocolError(_))
    }
}
