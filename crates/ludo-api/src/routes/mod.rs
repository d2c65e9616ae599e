//! Route modules.

pub mod health;
pub mod rooms;
pub mod ws;
