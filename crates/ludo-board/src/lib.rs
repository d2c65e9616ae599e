//! Ludo: token model and rule engine.
//!
//! Pure game rules with no notion of rooms or players: which token may move
//! for a given dice value, how it advances, and which opponent tokens it
//! captures. Positions are an integer progress counter; board geometry is
//! left to clients.

pub mod domain;
