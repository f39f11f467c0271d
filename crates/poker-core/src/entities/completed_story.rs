//! Completed story - immutable snapshot of a finalized story

use serde::{Deserialize, Serialize};

use super::{Story, Vote};

/// A finalized story as written to history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedStory {
    pub story_id: String,
    pub room_id: String,
    pub title: String,
    pub description: Option<String>,
    pub votes: Vec<Vote>,
    pub final_score: u32,
    pub completed_at: i64,
}

impl CompletedStory {
    /// Snapshot a story at finalization time
    pub fn from_story(story: &Story, final_score: u32, completed_at: i64) -> Self {
        Self {
            story_id: story.id.clone(),
            room_id: story.room_id.clone(),
            title: story.title.clone(),
            description: story.description.clone(),
            votes: story.votes.clone(),
            final_score,
            completed_at,
        }
    }
}
