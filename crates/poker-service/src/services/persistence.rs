//! Background persistence of finalized stories
//!
//! Finalizing a story never waits on storage. Snapshots are queued to a single
//! worker that writes them in order and retries failures with exponential
//! backoff. The in-memory state stays authoritative whatever the outcome.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use poker_common::PersistenceConfig;
use poker_core::{CompletedStory, CompletedStoryRepository};

/// Backoff schedule for failed saves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Delay before the retry that follows failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&PersistenceConfig::default())
    }
}

impl From<&PersistenceConfig> for RetryPolicy {
    fn from(config: &PersistenceConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

/// Handle for enqueueing completed stories
#[derive(Debug, Clone)]
pub struct PersistenceQueue {
    tx: mpsc::UnboundedSender<CompletedStory>,
}

impl PersistenceQueue {
    /// Start the worker and return the queue handle
    ///
    /// The worker exits once every queue handle has been dropped and the
    /// backlog is drained.
    pub fn spawn(
        repository: Arc<dyn CompletedStoryRepository>,
        policy: RetryPolicy,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<CompletedStory>();

        let worker = tokio::spawn(async move {
            while let Some(story) = rx.recv().await {
                save_with_retry(repository.as_ref(), &story, policy).await;
            }
            debug!("Persistence worker stopped");
        });

        (Self { tx }, worker)
    }

    /// Queue a snapshot for storage without blocking
    pub fn enqueue(&self, story: CompletedStory) {
        if let Err(e) = self.tx.send(story) {
            error!(
                room_id = %e.0.room_id,
                story_id = %e.0.story_id,
                "Persistence worker is gone, completed story not stored"
            );
        }
    }
}

async fn save_with_retry(
    repository: &dyn CompletedStoryRepository,
    story: &CompletedStory,
    policy: RetryPolicy,
) -> bool {
    for attempt in 1..=policy.max_attempts {
        match repository.save(story).await {
            Ok(()) => {
                debug!(
                    room_id = %story.room_id,
                    story_id = %story.story_id,
                    attempt,
                    "Completed story stored"
                );
                return true;
            }
            Err(e) if attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                warn!(
                    room_id = %story.room_id,
                    story_id = %story.story_id,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Failed to store completed story, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                error!(
                    room_id = %story.room_id,
                    story_id = %story.story_id,
                    attempts = attempt,
                    error = %e,
                    "Giving up on storing completed story"
                );
            }
        }
    }
    false
}
