//! Server configuration sourced from environment variables

use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_STATIC_URL: &str = "/static";
const DEFAULT_DATA_DIR: &str = ".chat-data";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 8;

/// Process-wide server settings, evaluated once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Debug flag; relaxes production safeguards for local development
    pub debug: bool,
    /// URL prefix static files are served under when debug is on
    pub static_url: String,
    /// Base directory holding the `static/` document root
    pub base_dir: PathBuf,
    /// Directory holding the JSON stores
    pub data_dir: PathBuf,
    pub bind: SocketAddr,
    pub admin_user: String,
    pub admin_password: String,
    pub token_ttl_hours: i64,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let debug = std::env::var("CHAT_DEBUG")
            .map(|raw| parse_flag(&raw))
            .unwrap_or(false);
        let static_url = std::env::var("CHAT_STATIC_URL")
            .map(|raw| normalize_static_url(&raw))
            .unwrap_or_else(|_| DEFAULT_STATIC_URL.to_string());
        let base_dir = std::env::var("CHAT_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let data_dir = std::env::var("CHAT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
        let bind = std::env::var("CHAT_BIND")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(|| DEFAULT_BIND.parse().expect("default bind address is valid"));
        let admin_user =
            std::env::var("CHAT_ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
        let admin_password =
            std::env::var("CHAT_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
        let token_ttl_hours = std::env::var("CHAT_TOKEN_TTL_HOURS")
            .ok()
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|ttl| *ttl > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_HOURS);

        Self {
            debug,
            static_url,
            base_dir,
            data_dir,
            bind,
            admin_user,
            admin_password,
            token_ttl_hours,
        }
    }

    /// Document root for the debug static file service
    pub fn static_root(&self) -> PathBuf {
        self.base_dir.join("static")
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Normalize a static URL prefix: leading slash, no trailing slash.
/// An empty prefix stays empty and disables static serving entirely.
fn normalize_static_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
