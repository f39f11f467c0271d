//! In-memory implementation of CompletedStoryRepository
//!
//! Used when no database is configured. History lives as long as the process.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use poker_core::traits::{CompletedStoryRepository, RepoResult};
use poker_core::CompletedStory;

/// Process-local completed story store
#[derive(Debug, Default)]
pub struct InMemoryCompletedStoryRepository {
    rooms: RwLock<HashMap<String, Vec<CompletedStory>>>,
}

impl InMemoryCompletedStoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored stories across rooms
    pub fn len(&self) -> usize {
        self.rooms.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CompletedStoryRepository for InMemoryCompletedStoryRepository {
    async fn save(&self, story: &CompletedStory) -> RepoResult<()> {
        let mut rooms = self.rooms.write();
        let stories = rooms.entry(story.room_id.clone()).or_default();
        if !stories.iter().any(|s| s.story_id == story.story_id) {
            stories.push(story.clone());
        }
        Ok(())
    }

    async fn find_by_room(&self, room_id: &str) -> RepoResult<Vec<CompletedStory>> {
        Ok(self.rooms.read().get(room_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(room_id: &str, story_id: &str) -> CompletedStory {
        CompletedStory {
            story_id: story_id.to_string(),
            room_id: room_id.to_string(),
            title: "Login flow".to_string(),
            description: None,
            votes: Vec::new(),
            final_score: 5,
            completed_at: 0,
        }
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = InMemoryCompletedStoryRepository::new();
        repo.save(&completed("r1", "s1")).await.unwrap();
        repo.save(&completed("r1", "s2")).await.unwrap();
        repo.save(&completed("r2", "s9")).await.unwrap();

        let stories = repo.find_by_room("r1").await.unwrap();
        let ids: Vec<_> = stories.iter().map(|s| s.story_id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2"]);
        assert!(repo.find_by_room("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_save_is_noop() {
        let repo = InMemoryCompletedStoryRepository::new();
        repo.save(&completed("r1", "s1")).await.unwrap();
        repo.save(&completed("r1", "s1")).await.unwrap();
        assert_eq!(repo.len(), 1);
    }
}
