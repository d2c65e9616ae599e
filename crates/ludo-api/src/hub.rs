//! Connection hub: one outbound channel per connected player.
//!
//! The socket task owns the receiving end and writes whatever arrives to the
//! socket. Sends never block, so delivering under the registry lock keeps
//! frames in the order their events were produced.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ludo_core::event::DomainEvent;
use ludo_core::identity::PlayerId;
use ludo_rooms::domain::events::RoomEvent;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::protocol::ServerNotice;

/// Receiving end of a player's outbound frames.
pub type FrameReceiver = mpsc::UnboundedReceiver<String>;

/// Routes text frames to connected players.
#[derive(Debug, Default)]
pub struct ConnectionHub {
    senders: Mutex<HashMap<PlayerId, mpsc::UnboundedSender<String>>>,
}

impl ConnectionHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn senders(&self) -> MutexGuard<'_, HashMap<PlayerId, mpsc::UnboundedSender<String>>> {
        // Poison is ignored; the map only holds senders.
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a channel for `player` and returns its receiving end.
    pub fn register(&self, player: PlayerId) -> FrameReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders().insert(player, tx);
        rx
    }

    /// Drops `player`'s channel.
    pub fn unregister(&self, player: PlayerId) {
        self.senders().remove(&player);
    }

    /// Number of open connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.senders().len()
    }

    /// Sends a raw frame to one player. Frames for players who are gone are
    /// dropped.
    pub fn send_to(&self, player: PlayerId, frame: String) {
        let senders = self.senders();
        let Some(tx) = senders.get(&player) else {
            debug!(%player, "no connection for player, frame dropped");
            return;
        };
        if let Err(e) = tx.send(frame) {
            debug!(%player, error = %e, "connection closed, frame dropped");
        }
    }

    /// Sends a connection-level notice to one player.
    pub fn send_notice(&self, player: PlayerId, notice: &ServerNotice) {
        match serde_json::to_string(notice) {
            Ok(frame) => self.send_to(player, frame),
            Err(e) => warn!(%player, error = %e, "failed to serialize notice"),
        }
    }

    /// Sends every event to its recipients, in order.
    pub fn deliver(&self, events: &[RoomEvent]) {
        for event in events {
            let frame = event.to_payload().to_string();
            for player in event.recipients.players() {
                self.send_to(*player, frame.clone());
            }
        }
    }
}
