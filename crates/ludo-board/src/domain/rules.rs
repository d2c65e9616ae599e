//! Rule engine: move legality, move application and capture resolution.
//!
//! Captures are purely positional: a mover that lands on the position of an
//! in-play token of another color sends that token back to home base. There
//! are no safe cells and no shared-track geometry.

use ludo_core::error::DomainError;
use ludo_core::rng::DeterministicRng;
use serde::Serialize;

use super::color::Color;
use super::token::{BoardTokens, TOTAL_STEPS, Token};

/// Lowest die face.
pub const MIN_FACE: u8 = 1;

/// Highest die face. Rolling it grants a repeat turn.
pub const MAX_FACE: u8 = 6;

/// The only roll that lets a token leave home base.
pub const ENTRY_ROLL: u8 = MAX_FACE;

/// A move the roller may make with the current dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidMove {
    /// Token to move.
    pub token_id: u8,
    /// Current position.
    pub from_position: i32,
    /// Position after the move (0 when leaving home base).
    pub to_position: i32,
}

/// An opponent token sent back to home base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedToken {
    /// Owner color of the captured token.
    pub color: Color,
    /// Id of the captured token within its color.
    pub token_id: u8,
}

/// Result of a successfully applied move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Token that moved.
    pub token_id: u8,
    /// Position before the move.
    pub from_position: i32,
    /// Position after the move.
    pub new_position: i32,
    /// Every opponent token captured by this move.
    pub captured: Vec<CapturedToken>,
    /// True if the token reached final home with this move.
    pub reached_home: bool,
}

impl MoveOutcome {
    /// The same seat keeps the turn after rolling the highest face or
    /// capturing.
    #[must_use]
    pub fn grants_repeat_turn(&self, dice: u8) -> bool {
        dice == MAX_FACE || !self.captured.is_empty()
    }
}

/// Rolls one die.
pub fn roll_die(rng: &mut dyn DeterministicRng) -> u8 {
    let face = rng
        .next_u32_range(u32::from(MIN_FACE), u32::from(MAX_FACE))
        .clamp(u32::from(MIN_FACE), u32::from(MAX_FACE));
    u8::try_from(face).unwrap_or(MAX_FACE)
}

/// Whether `token` may move `dice` steps.
#[must_use]
pub fn legal(token: &Token, dice: u8) -> bool {
    if !(MIN_FACE..=MAX_FACE).contains(&dice) {
        return false;
    }
    if token.is_in_base() {
        return dice == ENTRY_ROLL;
    }
    if token.is_home() {
        return false;
    }
    token.position() + i32::from(dice) <= TOTAL_STEPS
}

fn target_position(token: &Token, dice: u8) -> i32 {
    if token.is_in_base() {
        0
    } else {
        token.position() + i32::from(dice)
    }
}

/// Every legal move for `color` with `dice`, in token id order.
#[must_use]
pub fn valid_moves(tokens: &BoardTokens, color: Color, dice: u8) -> Vec<ValidMove> {
    tokens
        .of(color)
        .iter()
        .filter(|token| legal(token, dice))
        .map(|token| ValidMove {
            token_id: token.id(),
            from_position: token.position(),
            to_position: target_position(token, dice),
        })
        .collect()
}

/// Moves `color`'s token `token_id` by `dice` and resolves captures.
///
/// # Errors
///
/// Returns `DomainError::InvalidMove` if the token id is unknown or the move
/// is not legal. The board is left untouched in that case.
pub fn apply_move(
    tokens: &mut BoardTokens,
    color: Color,
    token_id: u8,
    dice: u8,
) -> Result<MoveOutcome, DomainError> {
    let token = tokens
        .token_mut(color, token_id)
        .ok_or(DomainError::InvalidMove)?;
    if !legal(token, dice) {
        return Err(DomainError::InvalidMove);
    }

    let from_position = token.position();
    let reached_home = if token.is_in_base() {
        token.enter_play();
        false
    } else {
        token.advance(i32::from(dice))
    };
    let new_position = token.position();

    let mut captured = Vec::new();
    if !reached_home {
        for other in Color::ALL.into_iter().filter(|c| *c != color) {
            for victim in tokens.of_mut(other).iter_mut() {
                if victim.is_in_play() && victim.position() == new_position {
                    victim.send_to_base();
                    captured.push(CapturedToken {
                        color: other,
                        token_id: victim.id(),
                    });
                }
            }
        }
    }

    Ok(MoveOutcome {
        token_id,
        from_position,
        new_position,
        captured,
        reached_home,
    })
}
