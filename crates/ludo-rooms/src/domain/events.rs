//! Outbound events for the rooms context.
//!
//! Every event carries its recipients, resolved at the moment the event was
//! produced, so the transport only has to look up connections.

use ludo_board::domain::color::Color;
use ludo_board::domain::rules::{CapturedToken, ValidMove};
use ludo_board::domain::token::BoardTokens;
use ludo_core::event::{DomainEvent, EventMetadata};
use ludo_core::identity::{PlayerId, RoomId};
use serde::Serialize;

use super::aggregates::Seat;

/// Who receives an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    /// A single player.
    Player(PlayerId),
    /// Every player seated in the room when the event was produced.
    Room(Vec<PlayerId>),
}

impl Recipients {
    /// Every recipient.
    #[must_use]
    pub fn players(&self) -> &[PlayerId] {
        match self {
            Self::Player(p) => std::slice::from_ref(p),
            Self::Room(members) => members,
        }
    }
}

/// Why the turn moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnChangeReason {
    /// The holder made a move that does not grant another turn.
    MoveCompleted,
    /// The holder rolled and had no legal move.
    NoValidMoves,
    /// A player left and the turn index moved.
    PlayerLeft,
}

/// Event payload variants, serialized as the outbound wire message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum RoomEventKind {
    /// Sent to a player after a successful join.
    RoomJoined {
        /// Joined room.
        room_id: RoomId,
        /// The joining player.
        player_id: PlayerId,
        /// Color of the joining player.
        color: Color,
        /// Seats in turn order.
        players: Vec<Seat>,
        /// Number of seated players.
        player_count: usize,
        /// Current token state.
        tokens: BoardTokens,
        /// Whether the game has started.
        started: bool,
        /// Current turn holder.
        current_player: Option<PlayerId>,
    },
    /// Broadcast whenever the seating changes.
    RoomUpdate {
        /// Room whose seating changed.
        room_id: RoomId,
        /// Seats in turn order.
        players: Vec<Seat>,
        /// Number of seated players.
        player_count: usize,
    },
    /// Broadcast once, when the second player sits down.
    GameStarted {
        /// Started room.
        room_id: RoomId,
        /// First turn holder.
        current_player: PlayerId,
        /// Token state at start.
        tokens: BoardTokens,
    },
    /// Sent to the player who may roll now.
    YourTurn {
        /// Room the turn belongs to.
        room_id: RoomId,
    },
    /// Broadcast on every roll.
    DiceRolled {
        /// Room of the roll.
        room_id: RoomId,
        /// Rolling player.
        player: PlayerId,
        /// Rolled value.
        dice: u8,
        /// Moves the roller may make.
        valid_moves: Vec<ValidMove>,
    },
    /// Broadcast after a successful move.
    TokenMoved {
        /// Room of the move.
        room_id: RoomId,
        /// Moving player.
        player: PlayerId,
        /// Color of the moved token.
        color: Color,
        /// Moved token.
        token_id: u8,
        /// Position before the move.
        from_position: i32,
        /// Position after the move.
        new_position: i32,
        /// First captured token, if any.
        captured_token: Option<CapturedToken>,
        /// Every captured token.
        captured_tokens: Vec<CapturedToken>,
        /// True if the token reached final home.
        reached_home: bool,
    },
    /// Broadcast whenever the turn passes to another seat.
    TurnChanged {
        /// Room of the turn change.
        room_id: RoomId,
        /// New turn holder.
        current_player: Option<PlayerId>,
        /// What caused the change.
        reason: TurnChangeReason,
    },
}

impl RoomEventKind {
    /// Wire name of the event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoomJoined { .. } => "room-joined",
            Self::RoomUpdate { .. } => "room-update",
            Self::GameStarted { .. } => "game-started",
            Self::YourTurn { .. } => "your-turn",
            Self::DiceRolled { .. } => "dice-rolled",
            Self::TokenMoved { .. } => "token-moved",
            Self::TurnChanged { .. } => "turn-changed",
        }
    }
}

/// Domain event envelope for the rooms context.
#[derive(Debug, Clone)]
pub struct RoomEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Who receives the event.
    pub recipients: Recipients,
    /// Event-specific payload.
    pub kind: RoomEventKind,
}

impl DomainEvent for RoomEvent {
    fn event_type(&self) -> &'static str {
        self.kind.name()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("RoomEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn event(kind: RoomEventKind) -> RoomEvent {
        RoomEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.name().to_owned(),
                room_id: RoomId::from("R1"),
                correlation_id: Uuid::new_v4(),
                occurred_at: Utc::now(),
            },
            recipients: Recipients::Room(vec![]),
            kind,
        }
    }

    #[test]
    fn test_payload_uses_kebab_type_and_camel_fields() {
        let player = PlayerId::new();
        let payload = event(RoomEventKind::DiceRolled {
            room_id: RoomId::from("R1"),
            player,
            dice: 6,
            valid_moves: vec![ValidMove {
                token_id: 0,
                from_position: -1,
                to_position: 0,
            }],
        })
        .to_payload();

        assert_eq!(payload["type"], "dice-rolled");
        assert_eq!(payload["roomId"], "R1");
        assert_eq!(payload["player"], player.to_string());
        assert_eq!(payload["dice"], 6);
        assert_eq!(payload["validMoves"][0]["tokenId"], 0);
        assert_eq!(payload["validMoves"][0]["toPosition"], 0);
    }

    #[test]
    fn test_event_type_matches_serialized_type() {
        let kinds = vec![
            RoomEventKind::YourTurn {
                room_id: RoomId::from("R1"),
            },
            RoomEventKind::TurnChanged {
                room_id: RoomId::from("R1"),
                current_player: None,
                reason: TurnChangeReason::NoValidMoves,
            },
            RoomEventKind::RoomUpdate {
                room_id: RoomId::from("R1"),
                players: vec![],
                player_count: 0,
            },
        ];
        for kind in kinds {
            let event = event(kind);
            assert_eq!(event.to_payload()["type"], event.event_type());
        }
    }

    #[test]
    fn test_turn_change_reason_is_kebab_case() {
        let payload = event(RoomEventKind::TurnChanged {
            room_id: RoomId::from("R1"),
            current_player: None,
            reason: TurnChangeReason::PlayerLeft,
        })
        .to_payload();
        assert_eq!(payload["reason"], "player-left");
        assert!(payload["currentPlayer"].is_null());
    }

    #[test]
    fn test_recipients_membership() {
        let (a, b) = (PlayerId::new(), PlayerId::new());
        assert_eq!(Recipients::Player(a).players(), &[a]);
        assert_eq!(Recipients::Room(vec![a, b]).players(), &[a, b]);
    }
}
