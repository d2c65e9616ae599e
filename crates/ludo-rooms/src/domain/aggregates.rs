//! The room aggregate and its turn state machine.

use chrono::{DateTime, Utc};
use ludo_board::domain::color::Color;
use ludo_board::domain::rules::{self, MoveOutcome, ValidMove};
use ludo_board::domain::token::BoardTokens;
use ludo_core::error::DomainError;
use ludo_core::identity::{PlayerId, RoomId};
use serde::Serialize;

/// Maximum number of seats in a room.
pub const MAX_SEATS: usize = 4;

/// Number of seated players that starts the game.
pub const MIN_PLAYERS_TO_START: usize = 2;

/// A taken seat. The color is fixed when the player joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    /// Seated player.
    pub player_id: PlayerId,
    /// Color the player moves.
    pub color: Color,
}

/// Turn state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Fewer than two players have ever been seated.
    WaitingForPlayers,
    /// The game runs; `current` is the only player allowed to roll or move.
    InProgress {
        /// Current turn holder.
        current: PlayerId,
    },
}

/// Result of trying to take a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStatus {
    /// The player took a new seat.
    Seated {
        /// Color assigned to the seat.
        color: Color,
        /// True if this join started the game.
        started_now: bool,
    },
    /// The player was already seated; nothing changed.
    AlreadySeated,
    /// Every seat is taken; nothing changed.
    RoomFull,
}

/// Full state of a room, for reconciliation after missed messages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// Room identifier.
    pub room_id: RoomId,
    /// Seats in turn order.
    pub players: Vec<Seat>,
    /// Current turn holder, if anyone is seated.
    pub current_player: Option<PlayerId>,
    /// Every token of every color.
    pub tokens: BoardTokens,
    /// Whether the game has started.
    pub started: bool,
    /// Last dice value rolled in the room.
    pub last_roll: Option<u8>,
    /// When the room was created.
    pub created_at: DateTime<Utc>,
}

/// One-line description of a room.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    /// Room identifier.
    pub room_id: RoomId,
    /// Number of seated players.
    pub player_count: usize,
    /// Whether the game has started.
    pub started: bool,
    /// When the room was created.
    pub created_at: DateTime<Utc>,
}

/// The aggregate root for one game session.
#[derive(Debug, Clone)]
pub struct Room {
    /// Room identifier.
    pub id: RoomId,
    /// Seats in join order, which is also turn order.
    seats: Vec<Seat>,
    /// Index of the current turn holder in `seats`.
    turn_index: usize,
    /// Set once two players have been seated; never reset.
    started: bool,
    tokens: BoardTokens,
    created_at: DateTime<Utc>,
    last_roll: Option<u8>,
    /// Bumped on every roll, move and change of turn holder.
    turn_serial: u64,
}

impl Room {
    /// Creates an empty room with every token in home base.
    #[must_use]
    pub fn new(id: RoomId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            seats: Vec::new(),
            turn_index: 0,
            started: false,
            tokens: BoardTokens::new(),
            created_at,
            last_roll: None,
            turn_serial: 0,
        }
    }

    /// Seats in turn order.
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Seated player ids in turn order.
    #[must_use]
    pub fn players(&self) -> Vec<PlayerId> {
        self.seats.iter().map(|s| s.player_id).collect()
    }

    /// Number of seated players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    /// True if nobody is seated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Whether the game has started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// All tokens in the room.
    #[must_use]
    pub fn tokens(&self) -> &BoardTokens {
        &self.tokens
    }

    /// When the room was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last dice value rolled in the room.
    #[must_use]
    pub fn last_roll(&self) -> Option<u8> {
        self.last_roll
    }

    /// Index of the current turn holder.
    #[must_use]
    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    /// Counter that changes whenever the turn situation changes.
    #[must_use]
    pub fn turn_serial(&self) -> u64 {
        self.turn_serial
    }

    /// Whether `player` holds a seat here.
    #[must_use]
    pub fn is_seated(&self, player: PlayerId) -> bool {
        self.seats.iter().any(|s| s.player_id == player)
    }

    /// Color of a seated player.
    #[must_use]
    pub fn color_of(&self, player: PlayerId) -> Option<Color> {
        self.seats
            .iter()
            .find(|s| s.player_id == player)
            .map(|s| s.color)
    }

    /// The player whose turn it is, if anyone is seated.
    #[must_use]
    pub fn current_turn_holder(&self) -> Option<PlayerId> {
        self.seats.get(self.turn_index).map(|s| s.player_id)
    }

    /// Current turn state.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        match (self.started, self.current_turn_holder()) {
            (true, Some(current)) => TurnPhase::InProgress { current },
            _ => TurnPhase::WaitingForPlayers,
        }
    }

    /// Full state for reconciliation.
    #[must_use]
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.id.clone(),
            players: self.seats.clone(),
            current_player: self.current_turn_holder(),
            tokens: self.tokens.clone(),
            started: self.started,
            last_roll: self.last_roll,
            created_at: self.created_at,
        }
    }

    /// One-line description.
    #[must_use]
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.id.clone(),
            player_count: self.seats.len(),
            started: self.started,
            created_at: self.created_at,
        }
    }

    /// Checks that `player` may roll or move right now.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GameNotStarted` while waiting for players and
    /// `DomainError::NotYourTurn` if `player` is not the turn holder.
    pub fn ensure_turn_holder(&self, player: PlayerId) -> Result<(), DomainError> {
        match self.phase() {
            TurnPhase::WaitingForPlayers => Err(DomainError::GameNotStarted(self.id.clone())),
            TurnPhase::InProgress { current } if current == player => Ok(()),
            TurnPhase::InProgress { .. } => Err(DomainError::NotYourTurn),
        }
    }

    /// Legal moves for `player` with `dice`. Empty for unseated players.
    #[must_use]
    pub fn valid_moves(&self, player: PlayerId, dice: u8) -> Vec<ValidMove> {
        self.color_of(player)
            .map(|color| rules::valid_moves(&self.tokens, color, dice))
            .unwrap_or_default()
    }

    /// Appends `player` if there is room. The first free color in seating
    /// order is assigned, so colors never collide after departures.
    pub(crate) fn seat(&mut self, player: PlayerId) -> JoinStatus {
        if self.is_seated(player) {
            return JoinStatus::AlreadySeated;
        }
        if self.seats.len() >= MAX_SEATS {
            return JoinStatus::RoomFull;
        }
        let Some(color) = Color::ALL
            .into_iter()
            .find(|c| self.seats.iter().all(|s| s.color != *c))
        else {
            return JoinStatus::RoomFull;
        };

        self.seats.push(Seat {
            player_id: player,
            color,
        });
        let started_now = !self.started && self.seats.len() >= MIN_PLAYERS_TO_START;
        if started_now {
            self.started = true;
            self.turn_index = 0;
        }
        JoinStatus::Seated { color, started_now }
    }

    /// Removes `player`'s seat. If the turn index no longer points at a
    /// seat it falls back to the first seat. The turn serial only moves when
    /// the turn holder changed. Returns false if `player` was not seated.
    pub(crate) fn unseat(&mut self, player: PlayerId) -> bool {
        let Some(index) = self.seats.iter().position(|s| s.player_id == player) else {
            return false;
        };
        let holder_before = self.current_turn_holder();
        self.seats.remove(index);
        if self.turn_index >= self.seats.len() {
            self.turn_index = 0;
        }
        if self.current_turn_holder() != holder_before {
            self.turn_serial += 1;
        }
        true
    }

    /// Hands the turn to the next seat. Returns the new holder, or `None`
    /// if nobody is seated.
    pub(crate) fn advance_turn(&mut self) -> Option<PlayerId> {
        if self.seats.is_empty() {
            return None;
        }
        self.turn_index = (self.turn_index + 1) % self.seats.len();
        self.turn_serial += 1;
        self.current_turn_holder()
    }

    pub(crate) fn record_roll(&mut self, dice: u8) {
        self.last_roll = Some(dice);
        self.turn_serial += 1;
    }

    /// Moves one of `player`'s tokens. Turn ownership is checked by the
    /// caller.
    pub(crate) fn apply_move(
        &mut self,
        player: PlayerId,
        token_id: u8,
        dice: u8,
    ) -> Result<MoveOutcome, DomainError> {
        let color = self.color_of(player).ok_or(DomainError::NotYourTurn)?;
        let outcome = rules::apply_move(&mut self.tokens, color, token_id, dice)?;
        self.turn_serial += 1;
        Ok(outcome)
    }
}
