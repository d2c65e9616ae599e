//! Domain layer for rooms: the room aggregate, the registry, commands and
//! outbound events.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod registry;
