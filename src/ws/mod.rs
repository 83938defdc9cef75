pub mod handlers;
mod lobby;
mod round;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let conn_id = ulid::Ulid::new().to_string();
    let (outbox, mut inbox) = mpsc::unbounded_channel::<ServerMessage>();
    state.gateway.register(conn_id.clone(), outbox).await;

    tracing::info!("WebSocket connected: {}", conn_id);

    loop {
        tokio::select! {
            // Messages routed to this connection by any handler
            outbound = inbox.recv() => {
                let Some(msg) = outbound else { break };
                if let Ok(json) = serde_json::to_string(&msg) {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
            }

            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received from {}: {}", conn_id, text);

                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                handlers::handle_message(client_msg, &conn_id, &state).await;
                            }
                            Err(e) => {
                                tracing::warn!("Failed to parse message from {}: {}", conn_id, e);
                                let error = ServerMessage::Error {
                                    message: format!("Invalid message format: {}", e),
                                    code: "PARSE_ERROR".to_string(),
                                };
                                if let Ok(json) = serde_json::to_string(&error) {
                                    let _ = sender.send(Message::Text(json.into())).await;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error on {}: {}", conn_id, e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    handlers::handle_disconnect(&conn_id, &state).await;

    tracing::info!("WebSocket connection closed: {}", conn_id);
}
