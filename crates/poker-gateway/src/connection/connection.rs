//! A single WebSocket connection bound to one participant in one room

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::{mpsc, Notify};

use crate::protocol::{CloseCode, WireMessage};

/// Why a message could not be queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    #[error("connection is closed")]
    Closed,
    #[error("outbound queue is full")]
    Full,
}

/// A registered room connection
///
/// The identity (room, participant) is fixed at registration and is the only
/// identity the server acts on for frames arriving on this connection.
pub struct Connection {
    session_id: String,
    room_id: String,
    participant_id: String,
    is_guest: bool,

    /// Bounded queue drained by the socket writer
    sender: mpsc::Sender<WireMessage>,

    closed: AtomicBool,
    close_code: Mutex<Option<CloseCode>>,
    close_signal: Notify,

    /// Last inbound frame of any kind
    last_activity: Mutex<Instant>,
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(
        session_id: String,
        room_id: impl Into<String>,
        participant_id: impl Into<String>,
        is_guest: bool,
        sender: mpsc::Sender<WireMessage>,
    ) -> Arc<Self> {
        let now = Instant::now();
        Arc::new(Self {
            session_id,
            room_id: room_id.into(),
            participant_id: participant_id.into(),
            is_guest,
            sender,
            closed: AtomicBool::new(false),
            close_code: Mutex::new(None),
            close_signal: Notify::new(),
            last_activity: Mutex::new(now),
            created_at: now,
        })
    }

    /// Generate a new session ID
    #[must_use]
    pub fn generate_session_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    pub fn is_guest(&self) -> bool {
        self.is_guest
    }

    /// Queue a message without waiting
    ///
    /// A full queue closes the connection with [`CloseCode::SlowConsumer`].
    pub fn try_send(&self, message: WireMessage) -> Result<(), SendError> {
        if self.is_closed() {
            return Err(SendError::Closed);
        }

        match self.sender.try_send(message) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.close(CloseCode::SlowConsumer);
                Err(SendError::Full)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.close(CloseCode::UnknownError);
                Err(SendError::Closed)
            }
        }
    }

    /// Mark the connection closed and wake its socket task
    ///
    /// Only the first call records a close code.
    pub fn close(&self, code: CloseCode) {
        self.close_inner(Some(code));
    }

    /// Stop deliveries after the peer went away, without a close code
    pub fn mark_closed(&self) {
        self.close_inner(None);
    }

    fn close_inner(&self, code: Option<CloseCode>) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            *self.close_code.lock() = code;
            self.close_signal.notify_one();
        }
    }

    /// Check if the connection no longer takes deliveries
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Close code recorded by [`Connection::close`]
    pub fn close_code(&self) -> Option<CloseCode> {
        *self.close_code.lock()
    }

    /// Wait until the connection is closed server-side
    pub async fn closed(&self) -> Option<CloseCode> {
        if !self.is_closed() {
            self.close_signal.notified().await;
        }
        self.close_code()
    }

    /// Record an inbound frame
    pub fn touch(&self) {
        *self.last_activity.lock() = Instant::now();
    }

    /// Time since the last inbound frame
    pub fn idle_for(&self) -> Duration {
        self.last_activity.lock().elapsed()
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("room_id", &self.room_id)
            .field("participant_id", &self.participant_id)
            .field("is_guest", &self.is_guest)
            .field("closed", &self.is_closed())
            .finish()
    }
}
