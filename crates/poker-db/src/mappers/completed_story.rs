//! CompletedStory entity <-> model mapper

use chrono::{DateTime, Utc};
use poker_core::{CompletedStory, DomainError, Vote};
use sqlx::types::Json;

use crate::models::CompletedStoryModel;

/// Convert epoch milliseconds to a timestamp column value
pub fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, DomainError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| DomainError::DatabaseError(format!("timestamp out of range: {millis}")))
}

impl TryFrom<CompletedStoryModel> for CompletedStory {
    type Error = DomainError;

    fn try_from(model: CompletedStoryModel) -> Result<Self, Self::Error> {
        let final_score = u32::try_from(model.final_score).map_err(|_| {
            DomainError::DatabaseError(format!(
                "stored final score out of range: {}",
                model.final_score
            ))
        })?;

        Ok(CompletedStory {
            story_id: model.story_id,
            room_id: model.room_id,
            title: model.title,
            description: model.description,
            votes: model.votes.0,
            final_score,
            completed_at: model.completed_at.timestamp_millis(),
        })
    }
}

/// Completed story values for database insertion
pub struct CompletedStoryInsert<'a> {
    pub room_id: &'a str,
    pub story_id: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub votes: Json<&'a [Vote]>,
    pub final_score: i64,
    pub completed_at: DateTime<Utc>,
}

impl<'a> CompletedStoryInsert<'a> {
    pub fn new(story: &'a CompletedStory) -> Result<Self, DomainError> {
        Ok(Self {
            room_id: &story.room_id,
            story_id: &story.story_id,
            title: &story.title,
            description: story.description.as_deref(),
            votes: Json(story.votes.as_slice()),
            final_score: i64::from(story.final_score),
            completed_at: millis_to_datetime(story.completed_at)?,
        })
    }
}
