//! Per-room broadcast hub
//!
//! Fans a room's messages out to every live subscriber. Channels are created
//! on first subscribe and pruned once the last subscriber is gone.

use std::collections::HashMap;

use tokio::sync::broadcast;
use tokio::sync::RwLock;

use chat_core::message::ChatMessage;

const ROOM_CHANNEL_CAPACITY: usize = 256;

#[derive(Default)]
pub struct ChatHub {
    rooms: RwLock<HashMap<String, broadcast::Sender<ChatMessage>>>,
}

impl ChatHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a room's live messages
    pub async fn subscribe(&self, room: &str) -> broadcast::Receiver<ChatMessage> {
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room.to_string())
            .or_insert_with(|| broadcast::channel(ROOM_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish a message to a room's subscribers, returning how many received it
    pub async fn publish(&self, room: &str, message: ChatMessage) -> usize {
        let mut rooms = self.rooms.write().await;
        let Some(sender) = rooms.get(room).cloned() else {
            return 0;
        };
        match sender.send(message) {
            Ok(delivered) => delivered,
            Err(_) => {
                // Nobody left listening; drop the channel
                rooms.remove(room);
                0
            }
        }
    }

    /// Number of live subscribers in a room
    pub async fn occupancy(&self, room: &str) -> usize {
        let rooms = self.rooms.read().await;
        rooms
            .get(room)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_all_subscribers() {
        let hub = ChatHub::new();
        let mut first = hub.subscribe("lounge").await;
        let mut second = hub.subscribe("lounge").await;

        let message = ChatMessage::new("lounge", "ada", "hello");
        let delivered = hub.publish("lounge", message.clone()).await;
        assert_eq!(delivered, 2);

        assert_eq!(first.recv().await.unwrap().id, message.id);
        assert_eq!(second.recv().await.unwrap().id, message.id);
    }

    #[tokio::test]
    async fn test_publish_to_empty_room_delivers_nothing() {
        let hub = ChatHub::new();
        let delivered = hub
            .publish("lounge", ChatMessage::new("lounge", "ada", "anyone?"))
            .await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        let hub = ChatHub::new();
        let mut lounge = hub.subscribe("lounge").await;
        let _other = hub.subscribe("other").await;

        hub.publish("other", ChatMessage::new("other", "bob", "psst"))
            .await;
        hub.publish("lounge", ChatMessage::new("lounge", "ada", "hi"))
            .await;

        let received = lounge.recv().await.unwrap();
        assert_eq!(received.room, "lounge");
    }

    #[tokio::test]
    async fn test_channel_pruned_after_last_subscriber_leaves() {
        let hub = ChatHub::new();
        let receiver = hub.subscribe("lounge").await;
        assert_eq!(hub.occupancy("lounge").await, 1);

        drop(receiver);
        hub.publish("lounge", ChatMessage::new("lounge", "ada", "gone"))
            .await;
        assert_eq!(hub.occupancy("lounge").await, 0);
    }
}
