//! Room model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A chat room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// URL-safe room slug, unique across the server
    pub name: String,
    pub topic: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Create a new room from a display name, slugifying it
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: normalize_room_name(name)?,
            topic: None,
            created_at: Utc::now(),
        })
    }

    /// Set the topic
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

/// Normalize a room name into its slug form.
///
/// Lowercases, collapses runs of non-alphanumerics into single dashes and
/// trims leading/trailing dashes. Empty results are rejected.
pub fn normalize_room_name(value: &str) -> Result<String> {
    let mut slug = String::with_capacity(value.len());
    let mut last_was_dash = false;
    for ch in value.chars().flat_map(|ch| ch.to_lowercase()) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        return Err(Error::InvalidInput(
            "Room name cannot be empty".to_string(),
        ));
    }
    Ok(slug)
}
