//! Event orchestration for one connection.
//!
//! Translates inbound frames into commands, runs the command handlers under
//! the registry lock, and fans the resulting events out through the hub.
//! Rejected commands become a single `error` frame to the sender.

use chrono::TimeDelta;
use ludo_core::clock::Clock;
use ludo_core::error::DomainError;
use ludo_core::identity::PlayerId;
use ludo_rooms::application::command_handlers::{self, PendingPass};
use ludo_rooms::domain::commands;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::hub::FrameReceiver;
use crate::protocol::{ClientMessage, ServerNotice};
use crate::state::AppState;

/// Registers a new connection under a fresh identity and greets it with a
/// `connected` notice.
pub fn connect(state: &AppState) -> (PlayerId, FrameReceiver) {
    let player_id = PlayerId::new();
    let receiver = state.hub.register(player_id);
    state
        .hub
        .send_notice(player_id, &ServerNotice::Connected { player_id });
    info!(%player_id, "player connected");
    (player_id, receiver)
}

/// Handles one inbound text frame from `player_id`.
pub fn handle_text(state: &AppState, player_id: PlayerId, text: &str) {
    let message = match ClientMessage::parse(text) {
        Ok(message) => message,
        Err(message) => {
            debug!(%player_id, %message, "rejected inbound frame");
            state
                .hub
                .send_notice(player_id, &ServerNotice::Error { message });
            return;
        }
    };

    if let Err(err) = dispatch(state, player_id, message) {
        debug!(%player_id, error = %err, "command rejected");
        state.hub.send_notice(
            player_id,
            &ServerNotice::Error {
                message: err.to_string(),
            },
        );
    }
}

/// Frees `player_id`'s seat and closes its channel.
pub fn disconnect(state: &AppState, player_id: PlayerId) {
    state.hub.unregister(player_id);
    if let Err(err) = leave(state, player_id) {
        warn!(%player_id, error = %err, "failed to release seat on disconnect");
    }
    info!(%player_id, "player disconnected");
}

/// Removes rooms older than `max_age`. Returns how many were removed.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the registry mutex is poisoned.
pub fn sweep_stale_rooms(state: &AppState, max_age: TimeDelta) -> Result<usize, DomainError> {
    let mut registry = state.lock_registry()?;
    Ok(registry.collect_garbage(state.clock.now(), max_age))
}

#[instrument(skip(state, message), fields(room_id = %message.room_id()))]
fn dispatch(
    state: &AppState,
    player_id: PlayerId,
    message: ClientMessage,
) -> Result<(), DomainError> {
    let correlation_id = Uuid::new_v4();
    let mut registry = state.lock_registry()?;

    match message {
        ClientMessage::JoinRoom { room_id } => {
            let command = commands::JoinRoom {
                correlation_id,
                room_id,
                player_id,
            };
            info!(correlation_id = %command.correlation_id, "handling join_room command");
            let events =
                command_handlers::handle_join_room(&command, state.clock.as_ref(), &mut registry)?;
            state.hub.deliver(&events);
        }
        ClientMessage::RollDice { room_id } => {
            let command = commands::RollDice {
                correlation_id,
                room_id,
                player_id,
            };
            info!(correlation_id = %command.correlation_id, "handling roll_dice command");
            let outcome = command_handlers::handle_roll_dice(
                &command,
                state.clock.as_ref(),
                &state.rng,
                &mut registry,
            )?;
            state.hub.deliver(&outcome.events);
            if let Some(pending) = outcome.pending_pass {
                schedule_pass(state, pending);
            }
        }
        ClientMessage::MoveToken {
            room_id,
            token_id,
            steps,
        } => {
            let command = commands::MoveToken {
                correlation_id,
                room_id,
                player_id,
                token_id,
                steps,
            };
            info!(correlation_id = %command.correlation_id, "handling move_token command");
            let events =
                command_handlers::handle_move_token(&command, state.clock.as_ref(), &mut registry)?;
            state.hub.deliver(&events);
        }
    }

    Ok(())
}

fn leave(state: &AppState, player_id: PlayerId) -> Result<(), DomainError> {
    let command = commands::LeaveRoom {
        correlation_id: Uuid::new_v4(),
        player_id,
    };
    let mut registry = state.lock_registry()?;
    let events = command_handlers::handle_leave_room(&command, state.clock.as_ref(), &mut registry)?;
    state.hub.deliver(&events);
    Ok(())
}

/// Runs the automatic pass after the configured delay, outside any lock.
fn schedule_pass(state: &AppState, pending: PendingPass) {
    let state = state.clone();
    debug!(
        room_id = %pending.room_id,
        delay = ?state.pass_turn_delay,
        "scheduling automatic pass"
    );
    tokio::spawn(async move {
        tokio::time::sleep(state.pass_turn_delay).await;
        let command = pending.into_command(Uuid::new_v4());
        if let Err(err) = run_pass(&state, &command) {
            warn!(room_id = %command.room_id, error = %err, "automatic pass failed");
        }
    });
}

fn run_pass(state: &AppState, command: &commands::PassTurn) -> Result<(), DomainError> {
    let mut registry = state.lock_registry()?;
    let events = command_handlers::handle_pass_turn(command, state.clock.as_ref(), &mut registry)?;
    state.hub.deliver(&events);
    Ok(())
}
