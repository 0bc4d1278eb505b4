//! File-based room storage implementation

use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

use super::model::{normalize_room_name, Room};
use crate::{Error, Result};

/// File-based room store using JSON, keyed by room slug
pub struct FileRoomStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory cache of rooms
    cache: RwLock<HashMap<String, Room>>,
}

impl FileRoomStore {
    /// Create a new FileRoomStore
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let rooms: Vec<Room> = serde_json::from_str(&content)?;
            rooms.into_iter().map(|r| (r.name.clone(), r)).collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Persist the cache to disk
    async fn persist(&self) -> Result<()> {
        let cache = self.cache.read().await;
        let rooms: Vec<&Room> = cache.values().collect();
        let content = serde_json::to_string_pretty(&rooms)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    /// Create a new room
    pub async fn create(&self, room: Room) -> Result<Room> {
        {
            let mut cache = self.cache.write().await;
            if cache.contains_key(&room.name) {
                return Err(Error::Conflict(format!(
                    "Room '{}' already exists",
                    room.name
                )));
            }
            cache.insert(room.name.clone(), room.clone());
        }
        self.persist().await?;
        Ok(room)
    }

    /// Get a room by name, accepting un-normalized input
    pub async fn get(&self, name: &str) -> Result<Option<Room>> {
        let slug = normalize_room_name(name)?;
        let cache = self.cache.read().await;
        Ok(cache.get(&slug).cloned())
    }

    /// Get all rooms, newest first
    pub async fn list(&self) -> Result<Vec<Room>> {
        let cache = self.cache.read().await;
        let mut rooms: Vec<Room> = cache.values().cloned().collect();
        rooms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rooms)
    }

    /// Delete a room by name, returning the removed room
    pub async fn delete(&self, name: &str) -> Result<Option<Room>> {
        let slug = normalize_room_name(name)?;
        let removed = {
            let mut cache = self.cache.write().await;
            cache.remove(&slug)
        };
        if removed.is_some() {
            self.persist().await?;
        }
        Ok(removed)
    }

    /// Number of rooms
    pub async fn count(&self) -> Result<usize> {
        let cache = self.cache.read().await;
        Ok(cache.len())
    }
}
