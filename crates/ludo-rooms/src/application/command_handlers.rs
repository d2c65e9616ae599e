//! Command handlers for the rooms context.
//!
//! Each handler validates first, mutates the registry second, and returns
//! the outbound events with their recipients. A handler that returns an
//! error has not changed any state. Callers run a handler to completion
//! under the registry lock.

use std::sync::Mutex;

use ludo_board::domain::rules::roll_die;
use ludo_core::clock::Clock;
use ludo_core::command::Command;
use ludo_core::error::DomainError;
use ludo_core::event::EventMetadata;
use ludo_core::identity::{PlayerId, RoomId};
use ludo_core::rng::DeterministicRng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::aggregates::{JoinStatus, Room};
use crate::domain::commands::{JoinRoom, LeaveRoom, MoveToken, PassTurn, RollDice};
use crate::domain::events::{Recipients, RoomEvent, RoomEventKind, TurnChangeReason};
use crate::domain::registry::RoomRegistry;

/// An automatic turn pass the caller should run after its delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPass {
    /// Room whose turn should pass.
    pub room_id: RoomId,
    /// Turn serial right after the roll.
    pub expected_serial: u64,
}

impl PendingPass {
    /// Builds the command that carries this pass out.
    #[must_use]
    pub fn into_command(self, correlation_id: Uuid) -> PassTurn {
        PassTurn {
            correlation_id,
            room_id: self.room_id,
            expected_serial: self.expected_serial,
        }
    }
}

/// Result of a roll.
#[derive(Debug)]
pub struct RollOutcome {
    /// Events to deliver.
    pub events: Vec<RoomEvent>,
    /// Set when the roller has no legal move.
    pub pending_pass: Option<PendingPass>,
}

/// Collects events produced by one command.
struct Outbox<'a> {
    room_id: RoomId,
    correlation_id: Uuid,
    clock: &'a dyn Clock,
    events: Vec<RoomEvent>,
}

impl<'a> Outbox<'a> {
    fn new(room_id: RoomId, correlation_id: Uuid, clock: &'a dyn Clock) -> Self {
        Self {
            room_id,
            correlation_id,
            clock,
            events: Vec::new(),
        }
    }

    fn push(&mut self, recipients: Recipients, kind: RoomEventKind) {
        let metadata = EventMetadata {
            event_id: Uuid::new_v4(),
            event_type: kind.name().to_owned(),
            room_id: self.room_id.clone(),
            correlation_id: self.correlation_id,
            occurred_at: self.clock.now(),
        };
        self.events.push(RoomEvent {
            metadata,
            recipients,
            kind,
        });
    }

    fn to_player(&mut self, player: PlayerId, kind: RoomEventKind) {
        self.push(Recipients::Player(player), kind);
    }

    fn to_room(&mut self, members: Vec<PlayerId>, kind: RoomEventKind) {
        self.push(Recipients::Room(members), kind);
    }

    fn your_turn(&mut self, player: Option<PlayerId>) {
        if let Some(player) = player {
            let room_id = self.room_id.clone();
            self.to_player(player, RoomEventKind::YourTurn { room_id });
        }
    }

    fn into_events(self) -> Vec<RoomEvent> {
        self.events
    }
}

fn room_joined(room: &Room, player: PlayerId) -> Option<RoomEventKind> {
    Some(RoomEventKind::RoomJoined {
        room_id: room.id.clone(),
        player_id: player,
        color: room.color_of(player)?,
        players: room.seats().to_vec(),
        player_count: room.player_count(),
        tokens: room.tokens().clone(),
        started: room.is_started(),
        current_player: room.current_turn_holder(),
    })
}

/// Handles the `JoinRoom` command: seats the player (creating the room if
/// needed) and announces the new seating. The second seat starts the game.
///
/// Re-joining a room one already sits in only repeats the `room-joined`
/// reply to the joiner.
///
/// A join on a full room changes nothing and nobody seated hears of it, but
/// the joiner gets `DomainError::RoomFull`, which the transport reports as an
/// `error` frame.
///
/// # Errors
///
/// Returns `DomainError::RoomFull` if every seat is taken and
/// `DomainError::AlreadyInRoom` if the player sits in another room. The
/// registry is unchanged in both cases.
pub fn handle_join_room(
    command: &JoinRoom,
    clock: &dyn Clock,
    registry: &mut RoomRegistry,
) -> Result<Vec<RoomEvent>, DomainError> {
    let outcome = registry.join_or_create(&command.room_id, command.player_id, clock)?;
    let room = registry
        .room(&command.room_id)
        .ok_or_else(|| DomainError::RoomNotFound(command.room_id.clone()))?;

    let mut outbox = Outbox::new(room.id.clone(), command.correlation_id, clock);
    match outcome.status {
        JoinStatus::RoomFull => {
            debug!(room_id = %room.id, player_id = %command.player_id, "join ignored, room full");
            return Err(DomainError::RoomFull(room.id.clone()));
        }
        JoinStatus::AlreadySeated => {
            if let Some(kind) = room_joined(room, command.player_id) {
                outbox.to_player(command.player_id, kind);
            }
        }
        JoinStatus::Seated { started_now, .. } => {
            if let Some(kind) = room_joined(room, command.player_id) {
                outbox.to_player(command.player_id, kind);
            }
            outbox.to_room(
                room.players(),
                RoomEventKind::RoomUpdate {
                    room_id: room.id.clone(),
                    players: room.seats().to_vec(),
                    player_count: room.player_count(),
                },
            );
            if started_now && let Some(current) = room.current_turn_holder() {
                info!(
                    room_id = %room.id,
                    player_count = room.player_count(),
                    correlation_id = %command.correlation_id(),
                    "game started"
                );
                outbox.to_room(
                    room.players(),
                    RoomEventKind::GameStarted {
                        room_id: room.id.clone(),
                        current_player: current,
                        tokens: room.tokens().clone(),
                    },
                );
                outbox.your_turn(Some(current));
            }
        }
    }

    Ok(outbox.into_events())
}

/// Handles the `RollDice` command: checks turn ownership, rolls the die with
/// the injected RNG, and broadcasts the roll with the roller's legal moves.
///
/// When there is no legal move, the returned outcome carries a
/// `PendingPass` that the caller runs after its delay.
///
/// The `Mutex` is locked only around the roll itself.
///
/// # Errors
///
/// Returns `DomainError::RoomNotFound`, `DomainError::GameNotStarted` or
/// `DomainError::NotYourTurn` before anything is rolled, and
/// `DomainError::Infrastructure` if the RNG mutex is poisoned.
pub fn handle_roll_dice(
    command: &RollDice,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    registry: &mut RoomRegistry,
) -> Result<RollOutcome, DomainError> {
    let room = registry.room_mut(&command.room_id)?;
    room.ensure_turn_holder(command.player_id)?;

    let dice = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
        roll_die(&mut *rng_guard)
    };
    let valid_moves = room.valid_moves(command.player_id, dice);
    room.record_roll(dice);

    info!(
        room_id = %room.id,
        player_id = %command.player_id,
        dice,
        valid_moves = valid_moves.len(),
        "dice rolled"
    );

    let pending_pass = valid_moves.is_empty().then(|| PendingPass {
        room_id: room.id.clone(),
        expected_serial: room.turn_serial(),
    });

    let mut outbox = Outbox::new(room.id.clone(), command.correlation_id, clock);
    outbox.to_room(
        room.players(),
        RoomEventKind::DiceRolled {
            room_id: room.id.clone(),
            player: command.player_id,
            dice,
            valid_moves,
        },
    );

    Ok(RollOutcome {
        events: outbox.into_events(),
        pending_pass,
    })
}

/// Handles the `MoveToken` command: checks turn ownership, applies the move,
/// and either keeps the turn with the mover (highest face or capture) or
/// hands it to the next seat.
///
/// # Errors
///
/// Returns `DomainError::RoomNotFound`, `DomainError::GameNotStarted`,
/// `DomainError::NotYourTurn` or `DomainError::InvalidMove`. The room is
/// unchanged in every error case.
pub fn handle_move_token(
    command: &MoveToken,
    clock: &dyn Clock,
    registry: &mut RoomRegistry,
) -> Result<Vec<RoomEvent>, DomainError> {
    let room = registry.room_mut(&command.room_id)?;
    room.ensure_turn_holder(command.player_id)?;
    let color = room
        .color_of(command.player_id)
        .ok_or(DomainError::NotYourTurn)?;

    let outcome = room.apply_move(command.player_id, command.token_id, command.steps)?;
    info!(
        room_id = %room.id,
        player_id = %command.player_id,
        token_id = command.token_id,
        new_position = outcome.new_position,
        captured = outcome.captured.len(),
        reached_home = outcome.reached_home,
        "token moved"
    );

    let mut outbox = Outbox::new(room.id.clone(), command.correlation_id, clock);
    let repeat = outcome.grants_repeat_turn(command.steps);
    outbox.to_room(
        room.players(),
        RoomEventKind::TokenMoved {
            room_id: room.id.clone(),
            player: command.player_id,
            color,
            token_id: outcome.token_id,
            from_position: outcome.from_position,
            new_position: outcome.new_position,
            captured_token: outcome.captured.first().copied(),
            captured_tokens: outcome.captured,
            reached_home: outcome.reached_home,
        },
    );

    if repeat {
        debug!(room_id = %room.id, player_id = %command.player_id, "repeat turn");
        outbox.your_turn(Some(command.player_id));
    } else {
        let next = room.advance_turn();
        outbox.to_room(
            room.players(),
            RoomEventKind::TurnChanged {
                room_id: room.id.clone(),
                current_player: next,
                reason: TurnChangeReason::MoveCompleted,
            },
        );
        outbox.your_turn(next);
    }

    Ok(outbox.into_events())
}

/// Handles the `PassTurn` command scheduled by a roll without legal moves.
///
/// The pass is silently dropped when the room no longer exists or anything
/// happened in it since the roll.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the handler signatures uniform.
pub fn handle_pass_turn(
    command: &PassTurn,
    clock: &dyn Clock,
    registry: &mut RoomRegistry,
) -> Result<Vec<RoomEvent>, DomainError> {
    let Ok(room) = registry.room_mut(&command.room_id) else {
        debug!(room_id = %command.room_id, "pass dropped, room gone");
        return Ok(Vec::new());
    };
    if room.turn_serial() != command.expected_serial {
        debug!(
            room_id = %room.id,
            expected = command.expected_serial,
            actual = room.turn_serial(),
            "pass dropped, room changed since roll"
        );
        return Ok(Vec::new());
    }

    let next = room.advance_turn();
    info!(room_id = %room.id, "no valid moves, turn passed");

    let mut outbox = Outbox::new(room.id.clone(), command.correlation_id, clock);
    outbox.to_room(
        room.players(),
        RoomEventKind::TurnChanged {
            room_id: room.id.clone(),
            current_player: next,
            reason: TurnChangeReason::NoValidMoves,
        },
    );
    outbox.your_turn(next);
    Ok(outbox.into_events())
}

/// Handles the `LeaveRoom` command issued on disconnect: frees the seat,
/// deletes the room if it became empty, and tells the remaining players
/// about the new seating and, if it moved, the new turn holder.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the handler signatures uniform.
pub fn handle_leave_room(
    command: &LeaveRoom,
    clock: &dyn Clock,
    registry: &mut RoomRegistry,
) -> Result<Vec<RoomEvent>, DomainError> {
    let Some(outcome) = registry.leave(command.player_id) else {
        return Ok(Vec::new());
    };
    if outcome.room_deleted {
        return Ok(Vec::new());
    }

    let members: Vec<PlayerId> = outcome.remaining.iter().map(|s| s.player_id).collect();
    let mut outbox = Outbox::new(outcome.room_id.clone(), command.correlation_id, clock);
    outbox.to_room(
        members.clone(),
        RoomEventKind::RoomUpdate {
            room_id: outcome.room_id.clone(),
            player_count: outcome.remaining.len(),
            players: outcome.remaining,
        },
    );
    if outcome.started && outcome.previous_holder != outcome.current_holder {
        outbox.to_room(
            members,
            RoomEventKind::TurnChanged {
                room_id: outcome.room_id.clone(),
                current_player: outcome.current_holder,
                reason: TurnChangeReason::PlayerLeft,
            },
        );
        outbox.your_turn(outcome.current_holder);
    }
    Ok(outbox.into_events())
}
