//! Ludo: rooms and turns.
//!
//! Owns every room of the server: who sits where, whose turn it is, and the
//! room-level view of the rule engine. Command handlers turn inbound player
//! intents into state changes plus the outbound events each recipient
//! should see.

pub mod application;
pub mod domain;
