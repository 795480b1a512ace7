//! Monitoring WebSocket
//!
//! One socket is one session: the read loop handles frames strictly in
//! arrival order, and the session is dropped when the socket closes.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::protocol::{handle_payload, ServerMessage};
use crate::AppState;

/// Upgrade to a monitoring socket
pub async fn monitor_ws(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let (id, session) = match state.registry.open() {
        Ok(opened) => opened,
        Err(e) => {
            error!("Failed to open session: {}", e);
            let _ = send(&mut socket, &ServerMessage::error(e.to_string())).await;
            return;
        }
    };
    info!("Client connected (session {})", id);
    metrics::counter!("monitor_sessions_opened_total").increment(1);
    record_active_sessions(&state);

    if send(&mut socket, &ServerMessage::connected()).await {
        while let Some(message) = socket.recv().await {
            let reply = match message {
                Ok(Message::Text(text)) => handle_payload(&session, text.as_bytes()),
                Ok(Message::Binary(bytes)) => handle_payload(&session, &bytes),
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => {
                    debug!("Session {} socket error: {}", id, e);
                    break;
                }
            };

            if !send(&mut socket, &reply).await {
                break;
            }
        }
    }

    if let Err(e) = state.registry.close(id) {
        error!("Failed to close session {}: {}", id, e);
    }
    record_active_sessions(&state);
    info!("Client disconnected (session {})", id);
}

fn record_active_sessions(state: &AppState) {
    match state.registry.len() {
        Ok(active) => metrics::gauge!("monitor_active_sessions").set(active as f64),
        Err(e) => warn!("Active session gauge not updated: {}", e),
    }
}

/// Returns false once the client is gone
async fn send(socket: &mut WebSocket, message: &ServerMessage) -> bool {
    socket.send(Message::Text(message.to_json())).await.is_ok()
}
