//! Story entity - a unit of work being estimated

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Vote;

/// Story lifecycle
///
/// `Created -> VotingOpen -> ResultsShown -> Finalized`. A story in
/// `ResultsShown` may be re-opened for another round of voting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryState {
    Created,
    VotingOpen,
    ResultsShown,
    Finalized,
}

impl StoryState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::VotingOpen => "voting_open",
            Self::ResultsShown => "results_shown",
            Self::Finalized => "finalized",
        }
    }
}

impl std::fmt::Display for StoryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Story entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub room_id: String,
    pub title: String,
    pub description: Option<String>,
    /// At most one vote per participant, in first-vote order
    pub votes: Vec<Vote>,
    pub final_score: Option<u32>,
    pub state: StoryState,
    pub created_at: i64,
}

impl Story {
    /// Create a new story in the `Created` state
    pub fn new(
        id: String,
        room_id: String,
        title: String,
        description: Option<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            room_id,
            title,
            description,
            votes: Vec::new(),
            final_score: None,
            state: StoryState::Created,
            created_at,
        }
    }

    /// Record a vote, replacing any earlier vote by the same participant
    pub fn record_vote(&mut self, vote: Vote) {
        match self.votes.iter_mut().find(|v| v.user_id == vote.user_id) {
            Some(existing) => *existing = vote,
            None => self.votes.push(vote),
        }
    }

    /// Check if a participant has voted
    pub fn has_voted(&self, user_id: &str) -> bool {
        self.votes.iter().any(|v| v.user_id == user_id)
    }

    /// Most common known vote, ties going to the smallest value
    ///
    /// Unknown votes never count. Returns `None` when nobody gave a number.
    pub fn suggested_score(&self) -> Option<u8> {
        let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
        for value in self.votes.iter().filter_map(|v| v.value.known()) {
            *counts.entry(value).or_default() += 1;
        }

        let mut best: Option<(u8, usize)> = None;
        for (value, count) in counts {
            // Ascending iteration: only a strictly higher count replaces
            match best {
                Some((_, c)) if count <= c => {}
                _ => best = Some((value, count)),
            }
        }
        best.map(|(value, _)| value)
    }

    #[inline]
    pub fn is_voting_open(&self) -> bool {
        self.state == StoryState::VotingOpen
    }

    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.state == StoryState::Finalized
    }
}
