//! Repository implementations
//!
//! Adapters for the `CompletedStoryRepository` port defined in poker-core.

mod completed_story;
mod error;
mod memory;

pub use completed_story::PgCompletedStoryRepository;
pub use memory::InMemoryCompletedStoryRepository;
