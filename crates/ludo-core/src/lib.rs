//! Ludo Core: shared domain abstractions.
//!
//! Identities, determinism seams (clock and dice), command/event traits and
//! the domain error type that the board, room and API crates build on. It
//! contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod identity;
pub mod rng;
