//! Shared application state.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use ludo_core::clock::Clock;
use ludo_core::error::DomainError;
use ludo_core::rng::DeterministicRng;
use ludo_rooms::domain::registry::RoomRegistry;

use crate::hub::ConnectionHub;

/// Application state shared across all request handlers and socket tasks.
#[derive(Clone)]
pub struct AppState {
    /// Every live room.
    pub registry: Arc<Mutex<RoomRegistry>>,
    /// Outbound channels of connected players.
    pub hub: Arc<ConnectionHub>,
    /// Time source.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Dice source.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Pause before the turn passes after a roll without legal moves.
    pub pass_turn_delay: Duration,
}

impl AppState {
    /// Create new application state with an empty registry.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        pass_turn_delay: Duration,
    ) -> Self {
        Self {
            registry: Arc::new(Mutex::new(RoomRegistry::new())),
            hub: Arc::new(ConnectionHub::new()),
            clock,
            rng,
            pass_turn_delay,
        }
    }

    /// Locks the registry. Never hold the guard across an `.await`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the mutex is poisoned.
    pub fn lock_registry(&self) -> Result<MutexGuard<'_, RoomRegistry>, DomainError> {
        self.registry
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("registry mutex poisoned: {e}")))
    }
}
