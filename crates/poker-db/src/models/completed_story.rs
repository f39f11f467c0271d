//! Completed story database model

use chrono::{DateTime, Utc};
use poker_core::Vote;
use sqlx::types::Json;
use sqlx::FromRow;

/// Database model for completed_stories table
#[derive(Debug, Clone, FromRow)]
pub struct CompletedStoryModel {
    pub seq: i64,
    pub room_id: String,
    pub story_id: String,
    pub title: String,
    pub description: Option<String>,
    pub votes: Json<Vec<Vote>>,
    pub final_score: i64,
    pub completed_at: DateTime<Utc>,
}
