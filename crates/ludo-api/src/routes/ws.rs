//! WebSocket endpoint.
//!
//! Each socket gets a fresh player identity. The connection task forwards
//! hub frames to the socket and feeds inbound text frames to the session.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::{Router, routing::get};
use tracing::debug;

use crate::session;
use crate::state::AppState;

/// GET /ws
async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| run_connection(socket, state))
}

async fn run_connection(mut socket: WebSocket, state: AppState) {
    let (player_id, mut outbound) = session::connect(&state);

    loop {
        tokio::select! {
            frame = outbound.recv() => {
                let Some(frame) = frame else { break };
                if let Err(e) = socket.send(Message::Text(frame.into())).await {
                    debug!(%player_id, error = %e, "socket send failed");
                    break;
                }
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    session::handle_text(&state, player_id, text.as_str());
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(%player_id, error = %e, "socket receive failed");
                    break;
                }
            },
        }
    }

    session::disconnect(&state, player_id);
}

/// Returns the WebSocket router.
pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(upgrade))
}
