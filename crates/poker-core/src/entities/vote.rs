//! Vote entity

use serde::{Deserialize, Serialize};

use crate::value_objects::VoteValue;

/// One participant's estimate on a story
///
/// Username and profile image are copied from the participant record when
/// the vote is cast so that completed stories keep a readable history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub user_id: String,
    pub username: String,
    pub profile_image: Option<String>,
    pub value: VoteValue,
    /// Server arrival time in milliseconds
    pub timestamp: i64,
}
