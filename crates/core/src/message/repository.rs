//! Message repository trait
//!
//! Defines the interface for message storage operations.

use async_trait::async_trait;
use uuid::Uuid;

use super::model::ChatMessage;
use crate::Result;

/// Repository interface for message storage operations
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a new message
    async fn append(&self, message: ChatMessage) -> Result<ChatMessage>;

    /// Get a message by ID
    async fn get(&self, id: Uuid) -> Result<Option<ChatMessage>>;

    /// Get up to `limit` messages for a room, oldest first.
    ///
    /// When `before` names an existing message, only messages sent strictly
    /// earlier than it are returned (cursor-based paging).
    async fn list_room(
        &self,
        room: &str,
        limit: usize,
        before: Option<Uuid>,
    ) -> Result<Vec<ChatMessage>>;

    /// Get the newest `limit` messages across all rooms, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>>;

    /// Delete a message by ID
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Delete every message in a room, returning how many were removed
    async fn delete_room(&self, room: &str) -> Result<usize>;

    /// Total number of stored messages
    async fn count(&self) -> Result<usize>;
}
