//! Application state

use std::sync::Arc;

use chat_core::message::FileMessageStore;
use chat_core::room::FileRoomStore;
use chat_core::Error;

use crate::auth::AdminStore;
use crate::chat::ChatHub;
use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    message_store: FileMessageStore,
    room_store: FileRoomStore,
    admin_store: AdminStore,
    hub: ChatHub,
    config: ServerConfig,
}

impl AppState {
    /// Create a new AppState, opening the stores under the data directory
    pub async fn new(config: ServerConfig) -> chat_core::Result<Self> {
        let message_store =
            FileMessageStore::new(config.data_dir.join("messages.json")).await?;
        let room_store = FileRoomStore::new(config.data_dir.join("rooms.json")).await?;
        let admin_store = AdminStore::new(
            config.data_dir.join("admin"),
            &config.admin_user,
            &config.admin_password,
        )
        .await
        .map_err(|err| Error::Storage(err.to_string()))?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                message_store,
                room_store,
                admin_store,
                hub: ChatHub::new(),
                config,
            }),
        })
    }

    pub fn message_store(&self) -> &FileMessageStore {
        &self.inner.message_store
    }

    pub fn room_store(&self) -> &FileRoomStore {
        &self.inner.room_store
    }

    pub fn admin_store(&self) -> &AdminStore {
        &self.inner.admin_store
    }

    pub fn hub(&self) -> &ChatHub {
        &self.inner.hub
    }

    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }
}
