//! # poker-db
//!
//! Persistence layer for finalized stories.
//!
//! Live room state never touches the database; only completed story snapshots
//! are written here. Two adapters implement `CompletedStoryRepository`:
//!
//! - [`PgCompletedStoryRepository`] - PostgreSQL via SQLx
//! - [`InMemoryCompletedStoryRepository`] - process-local, used when no
//!   database is configured and in tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use poker_db::{create_pool, ensure_schema, DatabaseConfig, PgCompletedStoryRepository};
//!
//! async fn example(url: &str) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::with_url(url)).await?;
//!     ensure_schema(&pool).await?;
//!     let repo = PgCompletedStoryRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, ensure_schema, DatabaseConfig, PgPool};
pub use repositories::{InMemoryCompletedStoryRepository, PgCompletedStoryRepository};
