//! Room registry: the in-memory map of every live room.
//!
//! The registry is an explicit object owned by whoever runs the server; all
//! room state is reached through it. A room exists exactly while at least
//! one player is seated in it.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use ludo_core::clock::Clock;
use ludo_core::error::DomainError;
use ludo_core::identity::{PlayerId, RoomId};
use tracing::info;

use super::aggregates::{JoinStatus, Room, RoomSnapshot, RoomSummary, Seat};

/// Result of `RoomRegistry::join_or_create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    /// What happened to the joining player.
    pub status: JoinStatus,
    /// True if this join created the room.
    pub room_created: bool,
}

/// Result of `RoomRegistry::leave`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// Room the player was removed from.
    pub room_id: RoomId,
    /// Seats left after the removal.
    pub remaining: Vec<Seat>,
    /// Whether the game in the room had started.
    pub started: bool,
    /// Turn holder before the removal.
    pub previous_holder: Option<PlayerId>,
    /// Turn holder after the removal.
    pub current_holder: Option<PlayerId>,
    /// True if the room was deleted because it became empty.
    pub room_deleted: bool,
}

/// Owns every room of the server.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// True if there are no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Whether a room with this id exists.
    #[must_use]
    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Looks up a room.
    #[must_use]
    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Looks up a room for mutation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RoomNotFound` if there is no such room.
    pub(crate) fn room_mut(&mut self, room_id: &RoomId) -> Result<&mut Room, DomainError> {
        self.rooms
            .get_mut(room_id)
            .ok_or_else(|| DomainError::RoomNotFound(room_id.clone()))
    }

    /// The room `player` is seated in, if any.
    #[must_use]
    pub fn room_of(&self, player: PlayerId) -> Option<&RoomId> {
        self.rooms
            .iter()
            .find(|(_, room)| room.is_seated(player))
            .map(|(id, _)| id)
    }

    /// Seats `player` in `room_id`, creating the room if it does not exist.
    ///
    /// Joining a room one is already seated in changes nothing, and so does
    /// joining a full room; the returned status tells which case applied.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyInRoom` if `player` is seated in a
    /// different room. No room is created in that case.
    pub fn join_or_create(
        &mut self,
        room_id: &RoomId,
        player: PlayerId,
        clock: &dyn Clock,
    ) -> Result<JoinOutcome, DomainError> {
        if let Some(current) = self.room_of(player)
            && current != room_id
        {
            return Err(DomainError::AlreadyInRoom(current.clone()));
        }

        let mut room_created = false;
        let room = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            room_created = true;
            Room::new(room_id.clone(), clock.now())
        });
        let status = room.seat(player);

        if room_created {
            info!(room_id = %room_id, "room created");
        }
        if let JoinStatus::Seated { color, .. } = status {
            info!(
                room_id = %room_id,
                player_id = %player,
                %color,
                player_count = room.player_count(),
                "player seated"
            );
        }

        Ok(JoinOutcome {
            status,
            room_created,
        })
    }

    /// Removes `player` from the room it is seated in. Deletes the room if
    /// it becomes empty. Returns `None` if the player was not seated.
    pub fn leave(&mut self, player: PlayerId) -> Option<LeaveOutcome> {
        let room_id = self.room_of(player)?.clone();
        let room = self.rooms.get_mut(&room_id)?;

        let previous_holder = room.current_turn_holder();
        room.unseat(player);
        let outcome = LeaveOutcome {
            room_id: room_id.clone(),
            remaining: room.seats().to_vec(),
            started: room.is_started(),
            previous_holder,
            current_holder: room.current_turn_holder(),
            room_deleted: room.is_empty(),
        };
        info!(room_id = %room_id, player_id = %player, "player removed");

        if outcome.room_deleted {
            self.rooms.remove(&room_id);
            info!(room_id = %room_id, "room deleted (empty)");
        }
        Some(outcome)
    }

    /// The player whose turn it is in `room_id`.
    #[must_use]
    pub fn current_turn_holder(&self, room_id: &RoomId) -> Option<PlayerId> {
        self.rooms.get(room_id)?.current_turn_holder()
    }

    /// Hands the turn in `room_id` to the next seat and returns the new
    /// holder.
    pub fn advance_turn(&mut self, room_id: &RoomId) -> Option<PlayerId> {
        self.rooms.get_mut(room_id)?.advance_turn()
    }

    /// Full state of a room.
    #[must_use]
    pub fn snapshot(&self, room_id: &RoomId) -> Option<RoomSnapshot> {
        self.rooms.get(room_id).map(Room::snapshot)
    }

    /// Summaries of every room, ordered by id.
    #[must_use]
    pub fn summaries(&self) -> Vec<RoomSummary> {
        let mut summaries: Vec<RoomSummary> = self.rooms.values().map(Room::summary).collect();
        summaries.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        summaries
    }

    /// Deletes every room with no players that was created more than
    /// `max_age` before `now`. Returns the number of rooms deleted.
    pub fn collect_garbage(&mut self, now: DateTime<Utc>, max_age: TimeDelta) -> usize {
        let before = self.rooms.len();
        self.rooms.retain(|room_id, room| {
            let stale = room.is_empty() && now - room.created_at() > max_age;
            if stale {
                info!(room_id = %room_id, "cleaned up old room");
            }
            !stale
        });
        before - self.rooms.len()
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, room: Room) {
        self.rooms.insert(room.id.clone(), room);
    }
}
