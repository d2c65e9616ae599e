//! Domain error types.

use thiserror::Error;

use crate::identity::RoomId;

/// Top-level domain error type.
///
/// Every variant is recoverable: it is reported to the player that caused
/// it and never leaves a room partially mutated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// The sender is not the current turn holder of the room.
    #[error("it's not your turn")]
    NotYourTurn,

    /// The requested move fails the legality rules.
    #[error("invalid move")]
    InvalidMove,

    /// No room exists with the given id.
    #[error("room not found: {0}")]
    RoomNotFound(RoomId),

    /// The room already seats the maximum number of players.
    #[error("room is full: {0}")]
    RoomFull(RoomId),

    /// The room is still waiting for a second player.
    #[error("game has not started in room {0}")]
    GameNotStarted(RoomId),

    /// The player is already seated in another room.
    #[error("already seated in room {0}")]
    AlreadyInRoom(RoomId),

    /// A shared resource could not be used (e.g. a poisoned lock).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
