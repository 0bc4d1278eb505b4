use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AdminUser {
    id: Uuid,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

/// File-backed store of admin users.
///
/// The configured admin account is bootstrapped on first start; its password
/// is stored salted and hashed, never in the clear.
#[derive(Clone)]
pub struct AdminStore {
    state: Arc<RwLock<HashMap<String, AdminUser>>>,
    file_path: PathBuf,
}

impl AdminStore {
    pub async fn new(
        base_dir: PathBuf,
        bootstrap_user: &str,
        bootstrap_password: &str,
    ) -> Result<Self, AuthError> {
        tokio::fs::create_dir_all(&base_dir).await.map_err(|err| {
            AuthError::Storage(format!("Failed to create admin directory: {}", err))
        })?;

        let file_path = base_dir.join("users.json");
        let state = load_users(&file_path).await?;
        let store = Self {
            state: Arc::new(RwLock::new(state)),
            file_path,
        };
        store.bootstrap(bootstrap_user, bootstrap_password).await?;
        Ok(store)
    }

    /// Create the bootstrap account unless it already exists
    async fn bootstrap(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = normalize_username(username)?;
        let mut state = self.state.write().await;
        if state.contains_key(&username) {
            return Ok(());
        }

        let user = AdminUser {
            id: Uuid::new_v4(),
            username: username.clone(),
            password_hash: hash_password(password),
            created_at: Utc::now(),
        };
        state.insert(username.clone(), user);
        persist_users(&self.file_path, &state).await?;
        tracing::info!("Bootstrapped admin account '{}'", username);
        Ok(())
    }

    /// Verify credentials, returning the canonical username
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let username = normalize_username(username)?;
        let state = self.state.read().await;
        let user = state
            .get(&username)
            .ok_or_else(|| AuthError::Unauthorized("Invalid credentials".to_string()))?;
        if !verify_password(&user.password_hash, password) {
            return Err(AuthError::Unauthorized("Invalid credentials".to_string()));
        }
        Ok(user.username.clone())
    }
}

async fn load_users(path: &Path) -> Result<HashMap<String, AdminUser>, AuthError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| AuthError::Storage(format!("Failed to read admin users: {}", err)))?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let users: Vec<AdminUser> = serde_json::from_str(&content)
        .map_err(|err| AuthError::Storage(format!("Failed to parse admin users: {}", err)))?;
    Ok(users
        .into_iter()
        .map(|user| (user.username.clone(), user))
        .collect())
}

async fn persist_users(
    path: &Path,
    state: &HashMap<String, AdminUser>,
) -> Result<(), AuthError> {
    let users: Vec<&AdminUser> = state.values().collect();
    let content = serde_json::to_string_pretty(&users)
        .map_err(|err| AuthError::Storage(format!("Failed to serialize admin users: {}", err)))?;
    tokio::fs::write(path, content)
        .await
        .map_err(|err| AuthError::Storage(format!("Failed to write admin users: {}", err)))?;
    Ok(())
}

fn normalize_username(username: &str) -> Result<String, AuthError> {
    let normalized = username.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(AuthError::InvalidInput("Username cannot be empty".to_string()));
    }
    Ok(normalized)
}

fn hash_password(password: &str) -> String {
    let mut salt = [0_u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();

    format!(
        "v1${}${}",
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(digest)
    )
}

fn verify_password(stored_hash: &str, password: &str) -> bool {
    let mut parts = stored_hash.split('$');
    let version = parts.next();
    let encoded_salt = parts.next();
    let encoded_digest = parts.next();
    if version != Some("v1") || encoded_salt.is_none() || encoded_digest.is_none() {
        return false;
    }

    let salt = match URL_SAFE_NO_PAD.decode(encoded_salt.unwrap()) {
        Ok(value) => value,
        Err(_) => return false,
    };
    let expected_digest = match URL_SAFE_NO_PAD.decode(encoded_digest.unwrap()) {
        Ok(value) => value,
        Err(_) => return false,
    };

    let mut hasher = Sha256::new();
    hasher.update(&salt);
    hasher.update(password.as_bytes());
    let actual_digest = hasher.finalize();
    expected_digest == actual_digest.as_slice()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    async fn build_store() -> (AdminStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = AdminStore::new(temp_dir.path().join("admin"), "admin", "verysecurepw")
            .await
            .unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_bootstrap_and_login() {
        let (store, _temp_dir) = build_store().await;
        let username = store.login("admin", "verysecurepw").await.unwrap();
        assert_eq!(username, "admin");
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let (store, _temp_dir) = build_store().await;
        let result = store.login("admin", "wrong").await;
        assert!(matches!(result, Err(AuthError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_unknown_user_is_unauthorized() {
        let (store, _temp_dir) = build_store().await;
        let result = store.login("nobody", "verysecurepw").await;
        assert!(matches!(result, Err(AuthError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_bootstrap_survives_restart_without_rehashing() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("admin");

        {
            AdminStore::new(dir.clone(), "admin", "firstpassword")
                .await
                .unwrap();
        }

        // A changed bootstrap password must not overwrite the stored account
        let store = AdminStore::new(dir, "admin", "otherpassword").await.unwrap();
        assert!(store.login("admin", "firstpassword").await.is_ok());
        assert!(store.login("admin", "otherpassword").await.is_err());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter22");
        assert!(verify_password(&hash, "hunter22"));
        assert!(!verify_password(&hash, "hunter23"));
        assert!(!verify_password("garbage", "hunter22"));
    }
}
