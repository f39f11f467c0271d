//! PostgreSQL implementation of CompletedStoryRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use poker_core::traits::{CompletedStoryRepository, RepoResult};
use poker_core::CompletedStory;

use crate::mappers::CompletedStoryInsert;
use crate::models::CompletedStoryModel;

use super::error::map_db_error;

/// PostgreSQL implementation of CompletedStoryRepository
#[derive(Clone)]
pub struct PgCompletedStoryRepository {
    pool: PgPool,
}

impl PgCompletedStoryRepository {
    /// Create a new PgCompletedStoryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompletedStoryRepository for PgCompletedStoryRepository {
    #[instrument(skip(self, story), fields(room_id = %story.room_id, story_id = %story.story_id))]
    async fn save(&self, story: &CompletedStory) -> RepoResult<()> {
        let insert = CompletedStoryInsert::new(story)?;

        // A retried save hits the unique key and becomes a no-op
        sqlx::query(
            r#"
            INSERT INTO completed_stories
                (room_id, story_id, title, description, votes, final_score, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (room_id, story_id) DO NOTHING
            "#,
        )
        .bind(insert.room_id)
        .bind(insert.story_id)
        .bind(insert.title)
        .bind(insert.description)
        .bind(insert.votes)
        .bind(insert.final_score)
        .bind(insert.completed_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_room(&self, room_id: &str) -> RepoResult<Vec<CompletedStory>> {
        let rows = sqlx::query_as::<_, CompletedStoryModel>(
            r#"
            SELECT seq, room_id, story_id, title, description, votes, final_score, completed_at
            FROM completed_stories
            WHERE room_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(CompletedStory::try_from).collect()
    }
}
