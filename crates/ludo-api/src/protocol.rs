//! Wire messages that are not room events.
//!
//! Inbound frames are JSON objects with a kebab-case `type` and camelCase
//! fields. Room events are serialized by the rooms context; this module only
//! covers what the client sends and the connection-level notices.

use ludo_core::identity::{PlayerId, RoomId};
use serde::{Deserialize, Serialize};

/// A frame sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Take a seat in a room, creating it if needed.
    JoinRoom {
        /// Room to join.
        room_id: RoomId,
    },
    /// Roll the die.
    RollDice {
        /// Room the roll happens in.
        room_id: RoomId,
    },
    /// Move one of one's tokens.
    MoveToken {
        /// Room the move happens in.
        room_id: RoomId,
        /// Token to move.
        token_id: u8,
        /// Dice value to move by.
        steps: u8,
    },
}

impl ClientMessage {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns a message suitable for an `error` frame if the text is not a
    /// known message or names an empty room.
    pub fn parse(text: &str) -> Result<Self, String> {
        let message: Self =
            serde_json::from_str(text).map_err(|e| format!("malformed message: {e}"))?;
        if message.room_id().as_str().trim().is_empty() {
            return Err("roomId must not be empty".to_string());
        }
        Ok(message)
    }

    /// Room the message refers to.
    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::JoinRoom { room_id }
            | Self::RollDice { room_id }
            | Self::MoveToken { room_id, .. } => room_id,
        }
    }
}

/// Connection-level notices sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerNotice {
    /// Sent once when the socket opens.
    Connected {
        /// Identity assigned to the connection.
        player_id: PlayerId,
    },
    /// Sent only to the sender of a rejected frame.
    Error {
        /// What went wrong.
        message: String,
    },
}
