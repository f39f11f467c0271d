//! Participant entity - a member of a room

use serde::{Deserialize, Serialize};

/// A room participant
///
/// The id is stable across reconnects: the JWT subject for registered users,
/// the issued guest id for guests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub username: String,
    pub profile_image: Option<String>,
    pub is_guest: bool,
}

impl Participant {
    /// Create a registered (non-guest) participant
    pub fn user(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            profile_image: None,
            is_guest: false,
        }
    }

    /// Create a guest participant
    pub fn guest(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            profile_image: None,
            is_guest: true,
        }
    }

    /// Builder: set the profile image
    pub fn with_profile_image(mut self, profile_image: impl Into<String>) -> Self {
        self.profile_image = Some(profile_image.into());
        self
    }

    /// Merge profile fields from a re-join
    ///
    /// A missing profile image keeps the known one.
    pub fn merge_profile(&mut self, username: String, profile_image: Option<String>) {
        self.username = username;
        if profile_image.is_some() {
            self.profile_image = profile_image;
        }
    }
}
