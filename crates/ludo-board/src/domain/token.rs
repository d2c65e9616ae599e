//! Token model.
//!
//! A token is always in exactly one of three states: in home base
//! (`position == HOME_BASE`), on the track (`in_play && !home`), or at final
//! home (`home`, `position == TOTAL_STEPS`). Only the rule engine mutates
//! tokens, through the crate-private transitions below.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::color::Color;

/// Position of a token that has not entered play yet.
pub const HOME_BASE: i32 = -1;

/// Progress count at which a token reaches final home.
pub const TOTAL_STEPS: i32 = 56;

/// Number of tokens each color owns.
pub const TOKENS_PER_COLOR: usize = 4;

/// A single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    id: u8,
    position: i32,
    in_play: bool,
    home: bool,
}

impl Token {
    /// Creates a token sitting in home base.
    #[must_use]
    pub fn new(id: u8) -> Self {
        Self {
            id,
            position: HOME_BASE,
            in_play: false,
            home: false,
        }
    }

    /// Identity within its color, 0–3.
    #[must_use]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Progress counter, `HOME_BASE` or `0..=TOTAL_STEPS`.
    #[must_use]
    pub fn position(&self) -> i32 {
        self.position
    }

    /// True while the token is on the track.
    #[must_use]
    pub fn is_in_play(&self) -> bool {
        self.in_play
    }

    /// True once the token reached final home. Terminal.
    #[must_use]
    pub fn is_home(&self) -> bool {
        self.home
    }

    /// True while the token waits in home base.
    #[must_use]
    pub fn is_in_base(&self) -> bool {
        self.position == HOME_BASE
    }

    pub(crate) fn enter_play(&mut self) {
        self.position = 0;
        self.in_play = true;
    }

    /// Moves the token forward, clamping at final home. Returns true if the
    /// token reached final home with this step.
    pub(crate) fn advance(&mut self, steps: i32) -> bool {
        self.position += steps;
        if self.position >= TOTAL_STEPS {
            self.position = TOTAL_STEPS;
            self.in_play = false;
            self.home = true;
            return true;
        }
        false
    }

    pub(crate) fn send_to_base(&mut self) {
        self.position = HOME_BASE;
        self.in_play = false;
    }

    #[cfg(test)]
    pub(crate) fn at(id: u8, position: i32) -> Self {
        let mut token = Self::new(id);
        if position >= 0 {
            token.enter_play();
            token.advance(position);
        }
        token
    }
}

/// Every token of every color in a room.
///
/// Tokens exist for all four colors from the moment the room is created,
/// whether or not the color's seat is ever taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTokens([[Token; TOKENS_PER_COLOR]; 4]);

impl BoardTokens {
    /// All sixteen tokens in home base.
    #[must_use]
    pub fn new() -> Self {
        Self([[0, 1, 2, 3].map(Token::new); 4])
    }

    /// The four tokens of a color.
    #[must_use]
    pub fn of(&self, color: Color) -> &[Token; TOKENS_PER_COLOR] {
        &self.0[color.index()]
    }

    /// A single token, if `token_id` is a valid id.
    #[must_use]
    pub fn token(&self, color: Color, token_id: u8) -> Option<&Token> {
        self.of(color).get(usize::from(token_id))
    }

    pub(crate) fn token_mut(&mut self, color: Color, token_id: u8) -> Option<&mut Token> {
        self.0[color.index()].get_mut(usize::from(token_id))
    }

    pub(crate) fn of_mut(&mut self, color: Color) -> &mut [Token; TOKENS_PER_COLOR] {
        &mut self.0[color.index()]
    }

    /// Test hook: place a color's token at a position.
    #[cfg(test)]
    pub(crate) fn place(&mut self, color: Color, token_id: u8, position: i32) {
        self.0[color.index()][usize::from(token_id)] = Token::at(token_id, position);
    }
}

impl Default for BoardTokens {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for BoardTokens {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Color::ALL.len()))?;
        for color in Color::ALL {
            map.serialize_entry(&color, self.of(color))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holds_exactly_one_state(token: &Token) -> bool {
        let states = [
            token.position() == HOME_BASE,
            token.is_in_play() && !token.is_home(),
            token.is_home(),
        ];
        states.iter().filter(|s| **s).count() == 1
    }

    #[test]
    fn test_new_board_has_all_tokens_in_base() {
        let board = BoardTokens::new();
        for color in Color::ALL {
            let tokens = board.of(color);
            for (i, token) in tokens.iter().enumerate() {
                assert_eq!(usize::from(token.id()), i);
                assert!(token.is_in_base());
                assert!(!token.is_in_play());
                assert!(!token.is_home());
            }
        }
    }

    #[test]
    fn test_advance_clamps_at_total_steps() {
        let mut token = Token::new(0);
        token.enter_play();
        token.advance(50);
        assert!(!token.advance(5));
        assert_eq!(token.position(), 55);
        assert!(token.advance(4));
        assert_eq!(token.position(), TOTAL_STEPS);
        assert!(token.is_home());
        assert!(holds_exactly_one_state(&token));
    }

    #[test]
    fn test_transitions_keep_single_state() {
        let mut token = Token::new(2);
        assert!(holds_exactly_one_state(&token));
        token.enter_play();
        assert!(holds_exactly_one_state(&token));
        token.advance(10);
        assert!(holds_exactly_one_state(&token));
        token.send_to_base();
        assert!(holds_exactly_one_state(&token));
        assert!(token.is_in_base());
    }

    #[test]
    fn test_token_lookup_rejects_unknown_id() {
        let board = BoardTokens::new();
        assert!(board.token(Color::Red, 3).is_some());
        assert!(board.token(Color::Red, 4).is_none());
    }

    #[test]
    fn test_serializes_as_color_keyed_map() {
        let json = serde_json::to_value(BoardTokens::new()).unwrap();
        let red = json["red"].as_array().unwrap();
        assert_eq!(red.len(), 4);
        assert_eq!(red[0]["position"], -1);
        assert_eq!(red[0]["inPlay"], false);
        assert_eq!(red[0]["home"], false);
        assert!(json["yellow"].is_array());
    }
}
