//! Admin moderation endpoints
//!
//! The /admin sub-application: login plus bearer-guarded moderation of rooms
//! and messages.

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chat_core::message::MessageRepository;

use crate::auth::{issue_admin_jwt, verify_admin_jwt, AdminClaims, AuthError};
use crate::routes::api::{
    internal_error, map_core_error, not_found, route_error, MessageResponse, RouteError,
};
use crate::state::AppState;

const DEFAULT_RECENT_LIMIT: usize = 50;
const MAX_RECENT_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    expires_at: String,
    username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OverviewResponse {
    rooms: usize,
    messages: usize,
    data_dir: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentQuery {
    #[serde(default)]
    limit: Option<usize>,
}

fn unauthorized(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::UNAUTHORIZED, error)
}

fn map_auth_error(err: AuthError) -> RouteError {
    match err {
        AuthError::Unauthorized(_) => unauthorized(err.to_string()),
        AuthError::InvalidInput(_) => route_error(StatusCode::BAD_REQUEST, err.to_string()),
        AuthError::Storage(_) => internal_error(err),
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn require_admin(headers: &HeaderMap) -> Result<AdminClaims, RouteError> {
    let token =
        extract_bearer_token(headers).ok_or_else(|| unauthorized("Missing bearer token"))?;
    verify_admin_jwt(token).map_err(unauthorized)
}

fn format_expiry(exp: usize) -> String {
    DateTime::<Utc>::from_timestamp(exp as i64, 0)
        .map(|ts| ts.to_rfc3339())
        .unwrap_or_default()
}

/// POST /admin/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, RouteError> {
    let username = state
        .admin_store()
        .login(&req.username, &req.password)
        .await
        .map_err(map_auth_error)?;

    let (token, exp) = issue_admin_jwt(&username, state.config().token_ttl_hours)
        .map_err(internal_error)?;

    Ok(Json(LoginResponse {
        token,
        expires_at: format_expiry(exp),
        username,
    }))
}

/// GET /admin/overview - store counts
async fn overview(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<OverviewResponse>, RouteError> {
    require_admin(&headers)?;

    let rooms = state.room_store().count().await.map_err(map_core_error)?;
    let messages = state
        .message_store()
        .count()
        .await
        .map_err(map_core_error)?;

    Ok(Json(OverviewResponse {
        rooms,
        messages,
        data_dir: state.config().data_dir.to_string_lossy().to_string(),
    }))
}

/// GET /admin/messages - newest messages across all rooms
async fn recent_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<MessageResponse>>, RouteError> {
    require_admin(&headers)?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_RECENT_LIMIT);
    let messages = state
        .message_store()
        .recent(limit)
        .await
        .map_err(map_core_error)?;

    Ok(Json(
        messages.into_iter().map(MessageResponse::from).collect(),
    ))
}

/// DELETE /admin/messages/{id}
async fn delete_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, RouteError> {
    require_admin(&headers)?;

    let deleted = state
        .message_store()
        .delete(id)
        .await
        .map_err(map_core_error)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(format!("Message {} not found", id)))
    }
}

/// DELETE /admin/rooms/{room} - remove a room and its messages
async fn delete_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<StatusCode, RouteError> {
    require_admin(&headers)?;

    let removed = state
        .room_store()
        .delete(&name)
        .await
        .map_err(map_core_error)?;

    match removed {
        Some(room) => {
            let purged = state
                .message_store()
                .delete_room(&room.name)
                .await
                .map_err(map_core_error)?;
            tracing::info!(
                "Admin removed room '{}' and {} messages",
                room.name,
                purged
            );
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(not_found(format!("Room '{}' not found", name))),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/overview", get(overview))
        .route("/messages", get(recent_messages))
        .route("/messages/{id}", delete(delete_message))
        .route("/rooms/{room}", delete(delete_room))
}
