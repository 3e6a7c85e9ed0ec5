//! HTTP routes of the relay server

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::infrastructure::state::AppState;
use crate::infrastructure::websocket::ws_handler;

/// Create all relay routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(ws_handler))
}

async fn health_check() -> &'static str {
    "OK"
}
