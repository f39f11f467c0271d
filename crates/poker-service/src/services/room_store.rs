//! Room store - authoritative in-memory state for every live room
//!
//! Each room sits behind its own `parking_lot::Mutex`. Everything that must be
//! ordered relative to a room's state changes (mutation, connection
//! registration, fan-out) happens while holding that lock. Rooms never share a
//! lock, so traffic in one room does not stall another.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info};

use poker_core::{
    generate_invite_code, normalize_invite_code, now_millis, DomainError, Participant, Room,
};

/// Attempts at drawing an unused invite code before giving up
const INVITE_CODE_ATTEMPTS: usize = 32;

/// Whether anyone is connected to a room
#[derive(Debug)]
struct Occupancy {
    /// Set while the room has no registered connection
    vacant_since: Option<Instant>,
    evicted: bool,
}

/// One room and its serialization boundary
#[derive(Debug)]
pub struct RoomHandle {
    id: String,
    state: Mutex<Room>,
    occupancy: Mutex<Occupancy>,
}

impl RoomHandle {
    fn new(room: Room) -> Self {
        Self {
            id: room.id.clone(),
            state: Mutex::new(room),
            occupancy: Mutex::new(Occupancy {
                vacant_since: Some(Instant::now()),
                evicted: false,
            }),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Enter the room's critical section
    ///
    /// Never hold the guard across an `.await`.
    pub fn lock(&self) -> MutexGuard<'_, Room> {
        self.state.lock()
    }

    /// Clone the current room state
    pub fn snapshot(&self) -> Room {
        self.state.lock().clone()
    }

    /// Record that the room has a registered connection
    ///
    /// Fails once the room has been evicted, so a connection racing the
    /// sweeper never lands in a room that is no longer in the store.
    pub fn occupy(&self) -> Result<(), DomainError> {
        let mut occupancy = self.occupancy.lock();
        if occupancy.evicted {
            return Err(DomainError::RoomNotFound(self.id.clone()));
        }
        occupancy.vacant_since = None;
        Ok(())
    }

    /// Record that the room's last connection went away
    pub fn vacate(&self) {
        let mut occupancy = self.occupancy.lock();
        if !occupancy.evicted {
            occupancy.vacant_since = Some(Instant::now());
        }
    }

    /// Restart the idle clock of a vacant room
    fn refresh(&self) {
        let mut occupancy = self.occupancy.lock();
        if occupancy.vacant_since.is_some() {
            occupancy.vacant_since = Some(Instant::now());
        }
    }

    /// Mark the room evicted if it has been vacant for longer than `ttl`
    fn try_evict(&self, ttl: Duration) -> bool {
        let mut occupancy = self.occupancy.lock();
        let expired = occupancy
            .vacant_since
            .is_some_and(|since| since.elapsed() >= ttl);
        if expired {
            occupancy.evicted = true;
        }
        expired
    }
}

/// All live rooms, indexed by id and by invite code
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: DashMap<String, Arc<RoomHandle>>,
    invite_codes: DashMap<String, String>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a room with `admin` as creator and sole participant
    pub fn create_room(&self, name: &str, admin: Participant) -> Result<Room, DomainError> {
        // Validate before reserving a code so a bad name leaves no trace
        Room::validate_name(name)?;

        let room_id = uuid::Uuid::new_v4().to_string();
        let invite_code = self.reserve_invite_code(&room_id)?;

        let room = match Room::new(room_id.clone(), name, invite_code.clone(), admin, now_millis())
        {
            Ok(room) => room,
            Err(e) => {
                self.invite_codes.remove(&invite_code);
                return Err(e);
            }
        };

        self.rooms
            .insert(room_id.clone(), Arc::new(RoomHandle::new(room.clone())));

        info!(
            room_id = %room_id,
            invite_code = %invite_code,
            admin_id = %room.admin_id,
            "Room created"
        );

        Ok(room)
    }

    /// Draw invite codes until one is free, claiming it atomically
    fn reserve_invite_code(&self, room_id: &str) -> Result<String, DomainError> {
        for _ in 0..INVITE_CODE_ATTEMPTS {
            let code = generate_invite_code();
            if let Entry::Vacant(slot) = self.invite_codes.entry(code.clone()) {
                slot.insert(room_id.to_string());
                return Ok(code);
            }
            debug!(code = %code, "Invite code collision, retrying");
        }

        Err(DomainError::InternalError(
            "could not allocate a unique invite code".to_string(),
        ))
    }

    /// Look up a room by id
    pub fn get(&self, room_id: &str) -> Option<Arc<RoomHandle>> {
        self.rooms.get(room_id).map(|r| Arc::clone(r.value()))
    }

    /// Look up a room by id, failing with `RoomNotFound`
    pub fn require(&self, room_id: &str) -> Result<Arc<RoomHandle>, DomainError> {
        self.get(room_id)
            .ok_or_else(|| DomainError::RoomNotFound(room_id.to_string()))
    }

    /// Look up a room by invite code (case-insensitive)
    pub fn find_by_invite_code(&self, code: &str) -> Option<Arc<RoomHandle>> {
        let code = normalize_invite_code(code);
        let room_id = self.invite_codes.get(&code).map(|r| r.value().clone())?;
        self.get(&room_id)
    }

    /// Add a participant to a room, or refresh their profile if already present
    pub fn join_room(&self, room_id: &str, participant: Participant) -> Result<Room, DomainError> {
        let handle = self.require(room_id)?;
        Ok(Self::join_handle(&handle, participant))
    }

    /// Join a room through its invite code
    pub fn join_by_invite_code(
        &self,
        code: &str,
        participant: Participant,
    ) -> Result<Room, DomainError> {
        let handle = self
            .find_by_invite_code(code)
            .ok_or_else(|| DomainError::InviteCodeNotFound(normalize_invite_code(code)))?;
        Ok(Self::join_handle(&handle, participant))
    }

    fn join_handle(handle: &RoomHandle, participant: Participant) -> Room {
        handle.refresh();
        let mut room = handle.lock();
        let participant_id = participant.id.clone();
        let added = room.join(participant, now_millis());

        debug!(
            room_id = %room.id,
            user_id = %participant_id,
            added,
            "Participant joined room"
        );

        room.clone()
    }

    /// Drop every room that has had no registered connection for `ttl`
    ///
    /// Returns the evicted rooms so callers can release what they hold for
    /// them. Their invite codes become free again.
    pub fn evict_idle(&self, ttl: Duration) -> Vec<Room> {
        let candidates: Vec<Arc<RoomHandle>> = self
            .rooms
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut evicted = Vec::new();
        for handle in candidates {
            if !handle.try_evict(ttl) {
                continue;
            }
            self.rooms.remove(handle.id());

            let room = handle.snapshot();
            self.invite_codes
                .remove_if(&room.invite_code, |_, room_id| *room_id == room.id);

            info!(
                room_id = %room.id,
                invite_code = %room.invite_code,
                completed_stories = room.completed_stories.len(),
                "Room evicted after idle period"
            );
            evicted.push(room);
        }

        evicted
    }

    /// Number of live rooms
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
