//! Ludo room server: WebSocket transport, connection hub and read-only
//! HTTP routes over the rooms context.

pub mod config;
pub mod error;
pub mod hub;
pub mod protocol;
pub mod routes;
pub mod session;
pub mod state;
pub mod telemetry;
