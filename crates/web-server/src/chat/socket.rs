//! WebSocket handler for chat room connections

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use chat_core::message::{ChatMessage, MessageRepository};

use super::protocol::{ClientEvent, ServerEvent};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/ws/chat/{room}", get(chat_ws_handler))
}

/// WebSocket upgrade handler; the room must exist before the upgrade
async fn chat_ws_handler(
    ws: WebSocketUpgrade,
    Path(room): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let room = match state.room_store().get(&room).await {
        Ok(Some(room)) => room,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, "Unknown room").into_response();
        }
        Err(err) => {
            warn!("Rejected chat connection room={} reason={}", room, err);
            return (StatusCode::BAD_REQUEST, "Invalid room name").into_response();
        }
    };

    info!("New chat connection room={}", room.name);
    ws.on_upgrade(move |socket| handle_chat_socket(socket, room.name, state))
        .into_response()
}

fn encode(event: &ServerEvent) -> Option<Message> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(err) => {
            error!("Failed to serialize frame: {}", err);
            None
        }
    }
}

/// Handle an individual chat WebSocket connection
async fn handle_chat_socket(socket: WebSocket, room: String, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Channel for frames bound for this client
    let (tx, mut rx) = mpsc::channel::<Message>(32);

    // Task to forward queued frames to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    if let Some(msg) = encode(&ServerEvent::Joined { room: room.clone() }) {
        let _ = tx.send(msg).await;
    }

    // Task to relay the room's broadcast feed to this client
    let mut updates = state.hub().subscribe(&room).await;
    let relay_tx = tx.clone();
    let relay_room = room.clone();
    let relay_task = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(message) => {
                    let Some(msg) = encode(&ServerEvent::message(&message)) else {
                        continue;
                    };
                    if relay_tx.send(msg).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        "Chat subscriber lagged in room={}, skipped {} messages",
                        relay_room, skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Process incoming frames from the client
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(ClientEvent::Message { sender, body }) => {
                    handle_client_message(&state, &room, sender, body, &tx).await;
                }
                Err(err) => {
                    let event = ServerEvent::error(format!("Invalid frame: {}", err));
                    if let Some(msg) = encode(&event) {
                        let _ = tx.send(msg).await;
                    }
                }
            },
            Ok(Message::Ping(data)) => {
                let _ = tx.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => {
                break;
            }
            Err(err) => {
                warn!("WebSocket error in room={}: {}", room, err);
                break;
            }
            _ => {}
        }
    }

    // Cleanup
    relay_task.abort();
    send_task.abort();
    info!("Chat connection closed room={}", room);
}

/// Persist an accepted message, then fan it out to the room
async fn handle_client_message(
    state: &AppState,
    room: &str,
    sender: String,
    body: String,
    tx: &mpsc::Sender<Message>,
) {
    let sender = sender.trim();
    let body = body.trim();
    if sender.is_empty() || body.is_empty() {
        let event = ServerEvent::error("Sender and body cannot be empty");
        if let Some(msg) = encode(&event) {
            let _ = tx.send(msg).await;
        }
        return;
    }

    let message = ChatMessage::new(room, sender, body);
    match state.message_store().append(message).await {
        Ok(message) => {
            state.hub().publish(room, message).await;
        }
        Err(err) => {
            warn!("Failed to store message in room={}: {}", room, err);
            let event = ServerEvent::error(err.to_string());
            if let Some(msg) = encode(&event) {
                let _ = tx.send(msg).await;
            }
        }
    }
}
