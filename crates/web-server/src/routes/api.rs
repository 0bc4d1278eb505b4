//! Chat API endpoints
//!
//! RESTful API for rooms and message history. Mounted under /api by the
//! route table.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chat_core::message::{ChatMessage, MessageRepository};
use chat_core::room::Room;
use chat_core::Error;

use crate::routes::health;
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 50;
const MAX_HISTORY_LIMIT: usize = 200;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub name: String,
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub name: String,
    pub topic: Option<String>,
    pub created_at: String,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            name: room.name,
            topic: room.topic,
            created_at: room.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub sender: String,
    pub body: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub room: String,
    pub sender: String,
    pub body: String,
    pub sent_at: String,
}

impl From<ChatMessage> for MessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            room: message.room,
            sender: message.sender,
            body: message.body,
            sent_at: message.sent_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub before: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type RouteError = (StatusCode, Json<ErrorResponse>);

pub fn route_error(status: StatusCode, error: impl Into<String>) -> RouteError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

pub fn bad_request(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::BAD_REQUEST, error)
}

pub fn not_found(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::NOT_FOUND, error)
}

pub fn internal_error(error: impl std::fmt::Display) -> RouteError {
    route_error(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
}

/// Map core store errors onto HTTP statuses
pub fn map_core_error(err: Error) -> RouteError {
    match err {
        Error::RoomNotFound(_) | Error::MessageNotFound(_) => {
            route_error(StatusCode::NOT_FOUND, err.to_string())
        }
        Error::InvalidInput(_) => bad_request(err.to_string()),
        Error::Conflict(_) => route_error(StatusCode::CONFLICT, err.to_string()),
        _ => internal_error(err),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/rooms - List all rooms
async fn list_rooms(
    State(state): State<AppState>,
) -> Result<Json<Vec<RoomResponse>>, RouteError> {
    let rooms = state.room_store().list().await.map_err(map_core_error)?;
    Ok(Json(rooms.into_iter().map(RoomResponse::from).collect()))
}

/// POST /api/rooms - Create a new room
async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>), RouteError> {
    let mut room = Room::new(&req.name).map_err(map_core_error)?;
    if let Some(topic) = req.topic {
        let topic = topic.trim();
        if !topic.is_empty() {
            room = room.with_topic(topic);
        }
    }

    let created = state.room_store().create(room).await.map_err(map_core_error)?;
    Ok((StatusCode::CREATED, Json(RoomResponse::from(created))))
}

/// GET /api/rooms/{room} - Get a single room
async fn get_room(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RoomResponse>, RouteError> {
    let room = state.room_store().get(&name).await.map_err(map_core_error)?;

    match room {
        Some(room) => Ok(Json(RoomResponse::from(room))),
        None => Err(not_found(format!("Room '{}' not found", name))),
    }
}

/// GET /api/rooms/{room}/messages - Room history, oldest first
async fn list_messages(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MessageResponse>>, RouteError> {
    let room = state
        .room_store()
        .get(&name)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| not_found(format!("Room '{}' not found", name)))?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);
    let messages = state
        .message_store()
        .list_room(&room.name, limit, query.before)
        .await
        .map_err(map_core_error)?;

    Ok(Json(
        messages.into_iter().map(MessageResponse::from).collect(),
    ))
}

/// POST /api/rooms/{room}/messages - Append a message and fan it out
async fn post_message(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), RouteError> {
    let room = state
        .room_store()
        .get(&name)
        .await
        .map_err(map_core_error)?
        .ok_or_else(|| not_found(format!("Room '{}' not found", name)))?;

    let sender = req.sender.trim();
    let body = req.body.trim();
    if sender.is_empty() {
        return Err(bad_request("Sender cannot be empty"));
    }
    if body.is_empty() {
        return Err(bad_request("Body cannot be empty"));
    }

    let message = ChatMessage::new(&room.name, sender, body);
    let stored = state
        .message_store()
        .append(message)
        .await
        .map_err(map_core_error)?;

    // Live subscribers see REST-posted messages too
    state.hub().publish(&room.name, stored.clone()).await;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(stored))))
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/{room}", get(get_room))
        .route(
            "/rooms/{room}/messages",
            get(list_messages).post(post_message),
        )
}
