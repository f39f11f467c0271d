//! Database models

mod completed_story;

pub use completed_story::CompletedStoryModel;
