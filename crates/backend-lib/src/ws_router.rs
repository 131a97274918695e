// ============================
// crates/backend-lib/src/ws_router.rs
// ============================
//! WebSocket router and connection handling.
//!
//! The transport layer stays thin: it upgrades the socket, registers the
//! connection with the coordinator, forwards parsed client messages into
//! the coordinator's queue and relays outbound events back over the
//! socket. All signaling decisions happen inside the coordinator task.

use crate::messages::{ClientMessage, ServerMessage};
use crate::metrics as keys;
use crate::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use consult_common::ConnId;
use futures_util::{SinkExt, StreamExt};
use metrics::{counter, gauge};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// Create the WebSocket router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for WebSocket connections
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    counter!(keys::WS_CONNECTION).increment(1);
    gauge!(keys::WS_ACTIVE).increment(1.0);

    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let conn_id = ConnId::new();

    // Outbound path: coordinator -> channel -> socket
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMessage>();
    if state.coordinator.connect(conn_id, out_tx.clone()).is_err() {
        warn!(%conn_id, "coordinator unavailable, dropping connection");
        return;
    }

    let send_task = tokio::spawn(async move {
        while let Some(server_msg) = out_rx.recv().await {
            let json = match serde_json::to_string(&server_msg) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize outbound message");
                    continue;
                },
            };
            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound path: socket -> parse -> coordinator queue
    while let Some(Ok(message)) = ws_rx.next().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    if state.coordinator.client_message(conn_id, client_msg).is_err() {
                        break;
                    }
                },
                Err(err) => {
                    debug!(%conn_id, error = %err, "malformed client message");
                    let _ = out_tx.send(ServerMessage::MalformedMessage {
                        error: err.to_string(),
                    });
                },
            },
            Message::Close(_) => break,
            // Axum answers pings itself; binary frames are not part of the
            // protocol.
            _ => {},
        }
    }

    // Cleanup: the disconnect event cancels any invitation bound to this
    // connection and updates presence.
    let _ = state.coordinator.disconnect(conn_id);

    counter!(keys::WS_DISCONNECTION).increment(1);
    gauge!(keys::WS_ACTIVE).decrement(1.0);

    send_task.abort();
}
