//! File-based message storage implementation
//!
//! Stores messages as JSON in a file on disk, kept in send order.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::ChatMessage;
use super::repository::MessageRepository;
use crate::Result;

/// File-based message store using JSON
pub struct FileMessageStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory cache of messages, oldest first
    cache: RwLock<Vec<ChatMessage>>,
}

impl FileMessageStore {
    /// Create a new FileMessageStore
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Persist the cache to disk
    async fn persist(&self) -> Result<()> {
        let cache = self.cache.read().await;
        let content = serde_json::to_string_pretty(&*cache)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for FileMessageStore {
    async fn append(&self, message: ChatMessage) -> Result<ChatMessage> {
        {
            let mut cache = self.cache.write().await;
            cache.push(message.clone());
        }
        self.persist().await?;
        Ok(message)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ChatMessage>> {
        let cache = self.cache.read().await;
        Ok(cache.iter().find(|m| m.id == id).cloned())
    }

    async fn list_room(
        &self,
        room: &str,
        limit: usize,
        before: Option<Uuid>,
    ) -> Result<Vec<ChatMessage>> {
        let cache = self.cache.read().await;
        let mut messages: &[ChatMessage] = &cache;

        // The cursor cuts the window at the named message, exclusive
        if let Some(before) = before {
            if let Some(pos) = messages.iter().position(|m| m.id == before) {
                messages = &messages[..pos];
            }
        }

        let mut room_messages: Vec<ChatMessage> = messages
            .iter()
            .filter(|m| m.room == room)
            .cloned()
            .collect();

        if room_messages.len() > limit {
            room_messages = room_messages.split_off(room_messages.len() - limit);
        }
        Ok(room_messages)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>> {
        let cache = self.cache.read().await;
        Ok(cache.iter().rev().take(limit).cloned().collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let removed = {
            let mut cache = self.cache.write().await;
            let len = cache.len();
            cache.retain(|m| m.id != id);
            cache.len() != len
        };
        if removed {
            self.persist().await?;
        }
        Ok(removed)
    }

    async fn delete_room(&self, room: &str) -> Result<usize> {
        let removed = {
            let mut cache = self.cache.write().await;
            let len = cache.len();
            cache.retain(|m| m.room != room);
            len - cache.len()
        };
        if removed > 0 {
            self.persist().await?;
        }
        Ok(removed)
    }

    async fn count(&self) -> Result<usize> {
        let cache = self.cache.read().await;
        Ok(cache.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (FileMessageStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("messages.json");
        let store = FileMessageStore::new(&path).await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_append_and_get() {
        let (store, _temp) = create_test_store().await;

        let message = ChatMessage::new("lounge", "ada", "hello");
        let appended = store.append(message.clone()).await.unwrap();

        assert_eq!(appended.id, message.id);
        let retrieved = store.get(message.id).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().body, "hello");

        // Non-existent message
        let missing = store.get(Uuid::new_v4()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_room_is_oldest_first() {
        let (store, _temp) = create_test_store().await;

        store.append(ChatMessage::new("lounge", "ada", "one")).await.unwrap();
        store.append(ChatMessage::new("other", "bob", "noise")).await.unwrap();
        store.append(ChatMessage::new("lounge", "ada", "two")).await.unwrap();

        let messages = store.list_room("lounge", 50, None).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].body, "one");
        assert_eq!(messages[1].body, "two");
    }

    #[tokio::test]
    async fn test_list_room_respects_limit() {
        let (store, _temp) = create_test_store().await;

        for i in 0..5 {
            store
                .append(ChatMessage::new("lounge", "ada", format!("msg {}", i)))
                .await
                .unwrap();
        }

        // The limit keeps the newest window, still oldest first
        let messages = store.list_room("lounge", 2, None).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].body, "msg 3");
        assert_eq!(messages[1].body, "msg 4");
    }

    #[tokio::test]
    async fn test_list_room_before_cursor() {
        let (store, _temp) = create_test_store().await;

        let first = store.append(ChatMessage::new("lounge", "ada", "one")).await.unwrap();
        let second = store.append(ChatMessage::new("lounge", "ada", "two")).await.unwrap();
        store.append(ChatMessage::new("lounge", "ada", "three")).await.unwrap();

        let messages = store
            .list_room("lounge", 50, Some(second.id))
            .await
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, first.id);
    }

    #[tokio::test]
    async fn test_recent_is_newest_first() {
        let (store, _temp) = create_test_store().await;

        store.append(ChatMessage::new("lounge", "ada", "one")).await.unwrap();
        store.append(ChatMessage::new("other", "bob", "two")).await.unwrap();

        let messages = store.recent(10).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].body, "two");
        assert_eq!(messages[1].body, "one");
    }

    #[tokio::test]
    async fn test_delete_message() {
        let (store, _temp) = create_test_store().await;

        let message = store.append(ChatMessage::new("lounge", "ada", "bye")).await.unwrap();

        let deleted = store.delete(message.id).await.unwrap();
        assert!(deleted);
        assert!(store.get(message.id).await.unwrap().is_none());

        // Delete again should return false
        let deleted_again = store.delete(message.id).await.unwrap();
        assert!(!deleted_again);
    }

    #[tokio::test]
    async fn test_delete_room() {
        let (store, _temp) = create_test_store().await;

        store.append(ChatMessage::new("lounge", "ada", "one")).await.unwrap();
        store.append(ChatMessage::new("lounge", "bob", "two")).await.unwrap();
        store.append(ChatMessage::new("other", "eve", "keep")).await.unwrap();

        let removed = store.delete_room("lounge").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.list_room("lounge", 50, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("messages.json");

        let message_id;

        // Create store and append a message
        {
            let store = FileMessageStore::new(&path).await.unwrap();
            let message = ChatMessage::new("lounge", "ada", "still here");
            message_id = message.id;
            store.append(message).await.unwrap();
        }

        // Create new store instance and verify data persisted
        {
            let store = FileMessageStore::new(&path).await.unwrap();
            let message = store.get(message_id).await.unwrap();
            assert!(message.is_some());
            let message = message.unwrap();
            assert_eq!(message.body, "still here");
            assert_eq!(message.room, "lounge");
        }
    }
}
