//! Domain layer for the board: colors, tokens and the rule engine.

pub mod color;
pub mod rules;
pub mod token;
