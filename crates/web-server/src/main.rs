//! Parlor chat web server
//!
//! Serves the landing and chat pages, the admin and API sub-applications and
//! the WebSocket chat transport on a single port.

mod auth;
mod chat;
mod config;
mod routes;
mod state;
mod table;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;
use crate::table::RouteTable;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!("Using data directory: {:?}", config.data_dir);

    // Create application state
    let state = AppState::new(config.clone())
        .await
        .expect("Failed to initialize application state");

    // The route table is evaluated once and drives router construction
    let table = RouteTable::new(&config);
    for entry in table.entries() {
        tracing::debug!("Route {} -> {:?}", entry.pattern, entry.target);
    }
    if config.debug {
        tracing::warn!(
            "Debug mode is on; serving static files from {:?} under {}",
            config.static_root(),
            config.static_url
        );
    }

    // WebSocket routing is merged alongside the page table
    let app = routes::build_router(&table)
        .merge(chat::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Chat server listening on {}", config.bind);

    let listener = tokio::net::TcpListener::bind(config.bind).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
