//! Arcane Warding Relay - Carries socket envelopes between session participants
//!
//! Every participant of a session connects to `/ws` with its room and
//! participant id; envelopes are relayed to the rest of the room. With
//! `coordinator.room` set, a headless ward engine joins that room too.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arcane_warding::infrastructure::config::AppConfig;
use arcane_warding::infrastructure::http;
use arcane_warding::infrastructure::runtime::start_coordinator;
use arcane_warding::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arcane_warding=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Arcane Warding relay");

    let config = AppConfig::load().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Bind: {}", config.bind_address());
    tracing::info!("  Ward feature: {}", config.ward.ward_feature);

    let addr = config.bind_address();
    let state = Arc::new(AppState::new(config));

    // Optional headless coordinator seated in one room
    let coordinator = match state.config.coordinator.room.clone() {
        Some(room) => {
            let runtime = start_coordinator(&state, &room)
                .await
                .with_context(|| format!("Failed to start coordinator for room {}", room))?;
            tracing::info!(%room, "Coordinator seated");
            Some(runtime)
        }
        None => None,
    };

    let app = Router::new()
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(runtime) = coordinator {
        runtime.shutdown();
    }
    tracing::info!("Relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
