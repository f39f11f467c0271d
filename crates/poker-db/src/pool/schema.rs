//! Table setup for completed stories

use sqlx::PgPool;

const CREATE_COMPLETED_STORIES: &str = r#"
CREATE TABLE IF NOT EXISTS completed_stories (
    seq          BIGSERIAL PRIMARY KEY,
    room_id      TEXT NOT NULL,
    story_id     TEXT NOT NULL,
    title        TEXT NOT NULL,
    description  TEXT,
    votes        JSONB NOT NULL DEFAULT '[]'::jsonb,
    final_score  BIGINT NOT NULL CHECK (final_score >= 0),
    completed_at TIMESTAMPTZ NOT NULL,
    UNIQUE (room_id, story_id)
)
"#;

const CREATE_ROOM_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_completed_stories_room
    ON completed_stories (room_id, seq)
"#;

/// Create the completed stories table if it does not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_COMPLETED_STORIES).execute(pool).await?;
    sqlx::query(CREATE_ROOM_INDEX).execute(pool).await?;
    tracing::debug!("completed_stories schema ready");
    Ok(())
}
