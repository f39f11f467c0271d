//! Entity to model mappers
//!
//! - `TryFrom<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert` structs: Prepare entity data for database operations

mod completed_story;

pub use completed_story::{millis_to_datetime, CompletedStoryInsert};
