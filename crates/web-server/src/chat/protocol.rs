//! Wire protocol for the chat WebSocket
//!
//! Tagged JSON frames in both directions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chat_core::message::ChatMessage;

/// Frames a client may send
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    Message { sender: String, body: String },
}

/// Frames the server sends
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Joined {
        room: String,
    },
    #[serde(rename_all = "camelCase")]
    Message {
        id: Uuid,
        room: String,
        sender: String,
        body: String,
        sent_at: String,
    },
    Error {
        message: String,
    },
}

impl ServerEvent {
    pub fn message(message: &ChatMessage) -> Self {
        Self::Message {
            id: message.id,
            room: message.room.clone(),
            sender: message.sender.clone(),
            body: message.body.clone(),
            sent_at: message.sent_at.to_rfc3339(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_frame_parses() {
        let frame = r#"{"type": "message", "sender": "ada", "body": "hello"}"#;
        let event: ClientEvent = serde_json::from_str(frame).unwrap();
        let ClientEvent::Message { sender, body } = event;
        assert_eq!(sender, "ada");
        assert_eq!(body, "hello");
    }

    #[test]
    fn test_unknown_frame_is_rejected() {
        let frame = r#"{"type": "shrug"}"#;
        assert!(serde_json::from_str::<ClientEvent>(frame).is_err());
    }

    #[test]
    fn test_server_message_frame_shape() {
        let message = ChatMessage::new("lounge", "ada", "hello");
        let value = serde_json::to_value(ServerEvent::message(&message)).unwrap();
        assert_eq!(value["type"], "message");
        assert_eq!(value["room"], "lounge");
        assert_eq!(value["sender"], "ada");
        assert_eq!(value["body"], "hello");
        assert!(value["sentAt"].is_string());
    }
}
