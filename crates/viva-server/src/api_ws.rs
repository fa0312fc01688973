//! Interview WebSocket: one socket per session, pushed questions out,
//! transcribed answers in.

use crate::forward::log_and_continue;
use crate::relay::OUTBOUND_BUFFER;
use crate::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        ConnectInfo, Extension, Path, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::mpsc;
use viva_types::{ClientMessage, ServerMessage};

/// WebSocket handler: `GET /ws/interview/{sessionId}`.
///
/// The session id is not checked against the registry: the socket may be
/// opened before the workflow engine has finished starting the session.
pub async fn ws_handler(
    Extension(state): Extension<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(session_id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    tracing::info!(
        session_id = %session_id,
        remote_addr = %addr,
        "interview websocket upgrade"
    );
    ws.on_upgrade(move |socket| handle_socket(socket, state, session_id))
}

/// Sends a JSON-serialized error frame over the connection's own buffer.
fn send_ws_error(tx: &mpsc::Sender<String>, message: String) {
    match serde_json::to_string(&ServerMessage::Error { message }) {
        Ok(json) => {
            if let Err(e) = tx.try_send(json) {
                tracing::warn!("failed to send WebSocket error to client: {}", e);
            }
        }
        Err(e) => {
            tracing::error!("failed to serialize WebSocket error message: {}", e);
        }
    }
}

/// Runs one connection until the client goes away.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, session_id: String) {
    let (mut sender, mut receiver) = socket.split();

    // Bounded; the relay drops frames once it is full.
    let (tx, mut rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);

    let connection_id = state.relay.register(session_id.clone(), tx.clone()).await;

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // Strictly sequential: each frame, including its forward, completes before
    // the next is read.
    while let Some(frame) = receiver.next().await {
        let msg = match frame {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(session_id = %session_id, "websocket receive error: {}", e);
                break;
            }
        };

        match msg {
            Message::Text(text) => handle_text(&state, &session_id, &tx, text.as_str()).await,
            Message::Close(_) => break,
            _ => {}
        }
    }

    state.relay.deregister(&session_id, connection_id).await;
    send_task.abort();
    tracing::info!(
        session_id = %session_id,
        connection_id = %connection_id,
        "interview websocket closed"
    );
}

async fn handle_text(state: &AppState, session_id: &str, tx: &mpsc::Sender<String>, text: &str) {
    let incoming = match ClientMessage::parse(text) {
        Ok(incoming) => incoming,
        Err(e) => {
            tracing::warn!(session_id = %session_id, "rejecting malformed frame: {}", e);
            send_ws_error(tx, format!("Malformed message: {e}"));
            return;
        }
    };

    match incoming.answer() {
        Some(answer) => {
            let result = state.forwarder.forward(session_id, answer).await;
            log_and_continue(session_id, result);
        }
        None => {
            tracing::trace!(session_id = %session_id, "ignoring frame without an answer");
        }
    }
}
