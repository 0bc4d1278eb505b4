//! Message model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single chat message in a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    /// Room slug this message belongs to
    pub room: String,
    pub sender: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new message in the given room
    pub fn new(
        room: impl Into<String>,
        sender: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            room: room.into(),
            sender: sender.into(),
            body: body.into(),
            sent_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_message() {
        let message = ChatMessage::new("lounge", "ada", "hello");
        assert_eq!(message.room, "lounge");
        assert_eq!(message.sender, "ada");
        assert_eq!(message.body, "hello");
    }

    #[test]
    fn test_message_ids_are_unique() {
        let first = ChatMessage::new("lounge", "ada", "one");
        let second = ChatMessage::new("lounge", "ada", "two");
        assert_ne!(first.id, second.id);
    }
}
