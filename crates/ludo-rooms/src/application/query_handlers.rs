//! Query handlers for the rooms context.
//!
//! Read-only views over the registry, used by the REST surface.

use ludo_core::error::DomainError;
use ludo_core::identity::RoomId;

use crate::domain::aggregates::{RoomSnapshot, RoomSummary};
use crate::domain::registry::RoomRegistry;

/// Retrieves the full state of one room.
///
/// # Errors
///
/// Returns `DomainError::RoomNotFound` if no room has the ID.
pub fn get_room_by_id(
    room_id: &RoomId,
    registry: &RoomRegistry,
) -> Result<RoomSnapshot, DomainError> {
    registry
        .snapshot(room_id)
        .ok_or_else(|| DomainError::RoomNotFound(room_id.clone()))
}

/// Lists every live room, ordered by ID.
#[must_use]
pub fn list_rooms(registry: &RoomRegistry) -> Vec<RoomSummary> {
    registry.summaries()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ludo_core::error::DomainError;
    use ludo_core::identity::{PlayerId, RoomId};

    use super::{get_room_by_id, list_rooms};
    use crate::domain::registry::RoomRegistry;
    use ludo_test_support::FixedClock;

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    #[test]
    fn test_get_room_by_id_returns_snapshot() {
        // Arrange
        let mut registry = RoomRegistry::new();
        let room_id = RoomId::from("R1");
        let (a, b) = (PlayerId::new(), PlayerId::new());
        registry.join_or_create(&room_id, a, &fixed_clock()).unwrap();
        registry.join_or_create(&room_id, b, &fixed_clock()).unwrap();

        // Act
        let snapshot = get_room_by_id(&room_id, &registry).unwrap();

        // Assert
        assert_eq!(snapshot.room_id, room_id);
        assert_eq!(snapshot.players.len(), 2);
        assert!(snapshot.started);
        assert_eq!(snapshot.current_player, Some(a));
        assert_eq!(snapshot.last_roll, None);
        assert_eq!(snapshot.created_at, fixed_clock().0);
    }

    #[test]
    fn test_get_room_by_id_returns_not_found() {
        // Arrange
        let registry = RoomRegistry::new();
        let room_id = RoomId::from("missing");

        // Act
        let result = get_room_by_id(&room_id, &registry);

        // Assert
        assert_eq!(result.unwrap_err(), DomainError::RoomNotFound(room_id));
    }

    #[test]
    fn test_list_rooms_is_ordered_by_id() {
        // Arrange
        let mut registry = RoomRegistry::new();
        for id in ["zeta", "alpha", "mid"] {
            registry
                .join_or_create(&RoomId::from(id), PlayerId::new(), &fixed_clock())
                .unwrap();
        }

        // Act
        let rooms = list_rooms(&registry);

        // Assert
        let ids: Vec<&str> = rooms.iter().map(|r| r.room_id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
        assert!(rooms.iter().all(|r| r.player_count == 1 && !r.started));
    }
}
