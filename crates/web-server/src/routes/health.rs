//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    version: String,
    data_dir: String,
    debug: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.config();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_dir: config.data_dir.to_string_lossy().to_string(),
        debug: config.debug,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
