//! Repository traits (ports)

mod repositories;

pub use repositories::{CompletedStoryRepository, RepoResult};
