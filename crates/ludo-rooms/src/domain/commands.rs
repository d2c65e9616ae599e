//! Commands for the rooms context.

use ludo_core::command::Command;
use ludo_core::identity::{PlayerId, RoomId};
use uuid::Uuid;

/// Command to take a seat in a room, creating it if needed.
#[derive(Debug, Clone)]
pub struct JoinRoom {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Room to join.
    pub room_id: RoomId,
    /// Joining player.
    pub player_id: PlayerId,
}

impl Command for JoinRoom {
    fn command_type(&self) -> &'static str {
        "rooms.join_room"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to roll the die on one's turn.
#[derive(Debug, Clone)]
pub struct RollDice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Room the roll happens in.
    pub room_id: RoomId,
    /// Rolling player.
    pub player_id: PlayerId,
}

impl Command for RollDice {
    fn command_type(&self) -> &'static str {
        "rooms.roll_dice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to move one of one's tokens.
#[derive(Debug, Clone)]
pub struct MoveToken {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Room the move happens in.
    pub room_id: RoomId,
    /// Moving player.
    pub player_id: PlayerId,
    /// Token to move, 0–3.
    pub token_id: u8,
    /// Dice value to move by.
    pub steps: u8,
}

impl Command for MoveToken {
    fn command_type(&self) -> &'static str {
        "rooms.move_token"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command issued by the server itself after a roll with no legal move.
#[derive(Debug, Clone)]
pub struct PassTurn {
    /// The correlation ID of the roll that scheduled this pass.
    pub correlation_id: Uuid,
    /// Room whose turn should pass.
    pub room_id: RoomId,
    /// `Room::turn_serial` right after the roll. The pass is dropped if the
    /// room changed since.
    pub expected_serial: u64,
}

impl Command for PassTurn {
    fn command_type(&self) -> &'static str {
        "rooms.pass_turn"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to give up one's seat, issued when a connection closes.
#[derive(Debug, Clone)]
pub struct LeaveRoom {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Departing player.
    pub player_id: PlayerId,
}

impl Command for LeaveRoom {
    fn command_type(&self) -> &'static str {
        "rooms.leave_room"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
