//! Room entity - the authoritative state of one planning session
//!
//! All methods are synchronous and take the acting participant id and the
//! current time from the caller. A method that returns an error leaves the
//! room untouched: checks run first (permission, then input validation, then
//! state), mutation only after every check has passed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{CompletedStory, Participant, Story, StoryState, Vote};
use crate::error::DomainError;
use crate::value_objects::VoteValue;

/// Maximum room name length in characters
pub const MAX_ROOM_NAME_LEN: usize = 100;

/// Result of a voting round closing on its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoClose {
    pub story_id: String,
    pub suggestion: Option<u8>,
}

/// Room entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub invite_code: String,
    pub admin_id: String,
    /// Ordered by join, unique by id
    pub participants: Vec<Participant>,
    /// Id of the story currently being estimated
    pub current_story: Option<String>,
    /// Every story ever created in this room
    pub stories: Vec<Story>,
    /// Append-only history of finalized stories
    pub completed_stories: Vec<CompletedStory>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Room {
    /// Create a room with the creator as admin and sole participant
    pub fn new(
        id: String,
        name: &str,
        invite_code: String,
        admin: Participant,
        now: i64,
    ) -> Result<Self, DomainError> {
        let name = Self::validate_name(name)?;

        Ok(Self {
            id,
            name,
            invite_code,
            admin_id: admin.id.clone(),
            participants: vec![admin],
            current_story: None,
            stories: Vec::new(),
            completed_stories: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Trim and validate a room name
    pub fn validate_name(name: &str) -> Result<String, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::ValidationError(
                "room name is required".to_string(),
            ));
        }
        if name.chars().count() > MAX_ROOM_NAME_LEN {
            return Err(DomainError::ValidationError(format!(
                "room name must be at most {MAX_ROOM_NAME_LEN} characters"
            )));
        }
        Ok(name.to_string())
    }

    // =========================================================================
    // Participants
    // =========================================================================

    /// Add a participant, or refresh the profile of a known one
    ///
    /// Returns `true` if the participant is new to the room.
    pub fn join(&mut self, participant: Participant, now: i64) -> bool {
        let added = match self.participant_mut(&participant.id) {
            Some(existing) => {
                existing.merge_profile(participant.username, participant.profile_image);
                false
            }
            None => {
                self.participants.push(participant);
                true
            }
        };
        self.updated_at = now;
        added
    }

    pub fn participant(&self, user_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == user_id)
    }

    fn participant_mut(&mut self, user_id: &str) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == user_id)
    }

    #[inline]
    pub fn is_participant(&self, user_id: &str) -> bool {
        self.participant(user_id).is_some()
    }

    #[inline]
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_id == user_id
    }

    /// Update a participant's own username and profile image
    ///
    /// `None` fields keep their current value.
    pub fn update_profile(
        &mut self,
        requester_id: &str,
        target_id: &str,
        username: Option<String>,
        profile_image: Option<String>,
        now: i64,
    ) -> Result<Participant, DomainError> {
        if requester_id != target_id {
            return Err(DomainError::NotOwnRecord);
        }
        if username.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(DomainError::ValidationError(
                "username must not be empty".to_string(),
            ));
        }

        let participant = self
            .participant_mut(target_id)
            .ok_or_else(|| DomainError::ParticipantNotFound(target_id.to_string()))?;

        let username = username.unwrap_or_else(|| participant.username.clone());
        participant.merge_profile(username, profile_image);
        let updated = participant.clone();
        self.updated_at = now;
        Ok(updated)
    }

    // =========================================================================
    // Stories
    // =========================================================================

    pub fn current_story(&self) -> Option<&Story> {
        let id = self.current_story.as_deref()?;
        self.story(id)
    }

    pub fn story(&self, story_id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.id == story_id)
    }

    /// Find the current story by id, mutably
    fn current_story_mut(&mut self, story_id: &str) -> Result<&mut Story, DomainError> {
        if self.current_story.as_deref() != Some(story_id) {
            return Err(DomainError::StoryNotFound(story_id.to_string()));
        }
        self.stories
            .iter_mut()
            .find(|s| s.id == story_id)
            .ok_or_else(|| DomainError::StoryNotFound(story_id.to_string()))
    }

    fn require_admin(&self, requester_id: &str, action: &'static str) -> Result<(), DomainError> {
        if self.is_admin(requester_id) {
            Ok(())
        } else {
            Err(DomainError::NotRoomAdmin(action))
        }
    }

    /// Start a new story; it becomes the room's current story
    pub fn start_story(
        &mut self,
        requester_id: &str,
        story_id: String,
        title: &str,
        description: Option<String>,
        now: i64,
    ) -> Result<Story, DomainError> {
        self.require_admin(requester_id, "start a story")?;

        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::ValidationError(
                "story title is required".to_string(),
            ));
        }
        if self.current_story.is_some() {
            return Err(DomainError::StoryAlreadyActive);
        }

        let description = description.filter(|d| !d.trim().is_empty());
        let story = Story::new(
            story_id,
            self.id.clone(),
            title.to_string(),
            description,
            now,
        );
        self.current_story = Some(story.id.clone());
        self.stories.push(story.clone());
        self.updated_at = now;
        Ok(story)
    }

    /// Open voting on the current story
    ///
    /// Re-opening a story whose results are shown clears the earlier votes.
    pub fn open_voting(
        &mut self,
        requester_id: &str,
        story_id: &str,
        now: i64,
    ) -> Result<(), DomainError> {
        self.require_admin(requester_id, "open voting")?;

        let story = self.current_story_mut(story_id)?;
        match story.state {
            StoryState::Created => {}
            StoryState::ResultsShown => story.votes.clear(),
            StoryState::VotingOpen => return Err(DomainError::VotingAlreadyOpen),
            StoryState::Finalized => return Err(DomainError::StoryAlreadyFinalized),
        }
        story.state = StoryState::VotingOpen;
        self.updated_at = now;
        Ok(())
    }

    /// Record a participant's vote on the current story
    ///
    /// Username and profile image come from the participant record, not from
    /// the caller.
    pub fn submit_vote(
        &mut self,
        voter_id: &str,
        story_id: &str,
        value: i64,
        now: i64,
    ) -> Result<Vote, DomainError> {
        let voter = self
            .participant(voter_id)
            .ok_or_else(|| DomainError::ParticipantNotFound(voter_id.to_string()))?;
        let value =
            VoteValue::from_wire(value).map_err(|e| DomainError::InvalidVoteValue(e.0))?;

        let vote = Vote {
            user_id: voter.id.clone(),
            username: voter.username.clone(),
            profile_image: voter.profile_image.clone(),
            value,
            timestamp: now,
        };

        let story = self.current_story_mut(story_id)?;
        if !story.is_voting_open() {
            return Err(DomainError::VotingNotOpen);
        }
        story.record_vote(vote.clone());
        self.updated_at = now;
        Ok(vote)
    }

    /// Close voting on the current story and return the score suggestion
    pub fn close_voting(
        &mut self,
        requester_id: &str,
        story_id: &str,
        now: i64,
    ) -> Result<Option<u8>, DomainError> {
        self.require_admin(requester_id, "end voting")?;

        let story = self.current_story_mut(story_id)?;
        if !story.is_voting_open() {
            return Err(DomainError::VotingNotOpen);
        }
        story.state = StoryState::ResultsShown;
        let suggestion = story.suggested_score();
        self.updated_at = now;
        Ok(suggestion)
    }

    /// Check whether every active participant has voted on the open story
    ///
    /// An empty active set never counts as complete.
    pub fn voting_complete(&self, active: &HashSet<String>) -> bool {
        match self.current_story() {
            Some(story) if story.is_voting_open() => {
                !active.is_empty() && active.iter().all(|id| story.has_voted(id))
            }
            _ => false,
        }
    }

    /// Close voting if every active participant has voted
    ///
    /// Returns `None` when the round is still waiting on someone, or when no
    /// round is open.
    pub fn auto_close_if_complete(
        &mut self,
        active: &HashSet<String>,
        now: i64,
    ) -> Option<AutoClose> {
        if !self.voting_complete(active) {
            return None;
        }

        let story_id = self.current_story.clone()?;
        let story = self.current_story_mut(&story_id).ok()?;
        story.state = StoryState::ResultsShown;
        let suggestion = story.suggested_score();
        self.updated_at = now;
        Some(AutoClose {
            story_id,
            suggestion,
        })
    }

    /// Finalize a story whose results are shown
    ///
    /// Appends the snapshot to the completed history and clears the current
    /// story. Finalizing twice is a conflict and never duplicates history.
    pub fn finalize_story(
        &mut self,
        requester_id: &str,
        story_id: &str,
        final_score: i64,
        now: i64,
    ) -> Result<CompletedStory, DomainError> {
        self.require_admin(requester_id, "save the final score")?;

        let final_score =
            u32::try_from(final_score).map_err(|_| DomainError::InvalidFinalScore(final_score))?;

        let story = self
            .stories
            .iter_mut()
            .find(|s| s.id == story_id)
            .ok_or_else(|| DomainError::StoryNotFound(story_id.to_string()))?;

        match story.state {
            StoryState::ResultsShown => {}
            StoryState::Finalized => return Err(DomainError::StoryAlreadyFinalized),
            StoryState::Created | StoryState::VotingOpen => {
                return Err(DomainError::ResultsNotShown)
            }
        }

        story.state = StoryState::Finalized;
        story.final_score = Some(final_score);
        let completed = CompletedStory::from_story(story, final_score, now);

        self.completed_stories.push(completed.clone());
        if self.current_story.as_deref() == Some(story_id) {
            self.current_story = None;
        }
        self.updated_at = now;
        Ok(completed)
    }
}
