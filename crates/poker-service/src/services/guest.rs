//! Guest identities
//!
//! A guest is issued an id for exactly one room. The id doubles as the
//! participant id and as the credential on the guest WebSocket route.

use dashmap::DashMap;
use tracing::debug;

/// An issued guest identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestIdentity {
    pub guest_id: String,
    pub room_id: String,
    pub username: String,
}

/// Issued guest identities, keyed by guest id
#[derive(Debug, Default)]
pub struct GuestDirectory {
    guests: DashMap<String, GuestIdentity>,
}

impl GuestDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh guest id scoped to a room
    pub fn issue(&self, room_id: &str, username: &str) -> GuestIdentity {
        let identity = self.register(uuid::Uuid::new_v4().to_string(), room_id, username);

        debug!(guest_id = %identity.guest_id, room_id = %room_id, "Guest identity issued");
        identity
    }

    /// Record a guest id chosen by the caller
    pub fn register(&self, guest_id: String, room_id: &str, username: &str) -> GuestIdentity {
        let identity = GuestIdentity {
            guest_id,
            room_id: room_id.to_string(),
            username: username.to_string(),
        };
        self.guests
            .insert(identity.guest_id.clone(), identity.clone());
        identity
    }

    pub fn get(&self, guest_id: &str) -> Option<GuestIdentity> {
        self.guests.get(guest_id).map(|g| g.value().clone())
    }

    /// Return the identity only if it was issued for `room_id`
    pub fn verify(&self, guest_id: &str, room_id: &str) -> Option<GuestIdentity> {
        self.get(guest_id).filter(|g| g.room_id == room_id)
    }

    /// Forget every guest issued for `room_id`
    pub fn remove_room(&self, room_id: &str) -> usize {
        let before = self.guests.len();
        self.guests.retain(|_, guest| guest.room_id != room_id);
        let removed = before.saturating_sub(self.guests.len());

        debug!(room_id = %room_id, removed, "Guest identities released");
        removed
    }

    pub(crate) fn len(&self) -> usize {
        self.guests.len()
    }
}
