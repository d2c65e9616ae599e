//! Application layer: command and query handlers over the room registry.

pub mod command_handlers;
pub mod query_handlers;
