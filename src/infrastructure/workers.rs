//! Background workers
//!
//! The socket listener feeds envelopes from other participants into the
//! engine; the expiry sweeper withdraws one-shot subscriptions nobody used.

use std::sync::Arc;
use std::time::Duration;

use crate::application::dto::SocketMessage;
use crate::application::services::{ArcaneWardService, NotificationDispatcher};
use crate::infrastructure::broadcast::Inbox;

/// Drain the participant's inbox into the engine until it closes
///
/// Dialog requests wait on a human, so each runs on its own task to keep
/// later envelopes (including the results it depends on) flowing.
pub async fn socket_listener<I: Inbox>(engine: Arc<ArcaneWardService>, mut inbox: I) {
    tracing::info!("Starting socket listener");
    while let Some(message) = inbox.recv().await {
        let kind = message.type_name();
        match message {
            SocketMessage::CreateDialog { .. } => {
                let engine = engine.clone();
                tokio::spawn(async move {
                    if let Err(e) = engine.handle_socket_message(message).await {
                        tracing::error!("Failed to answer dialog request: {}", e);
                    }
                });
            }
            other => {
                if let Err(e) = engine.handle_socket_message(other).await {
                    tracing::error!(kind, "Failed to handle socket message: {}", e);
                }
            }
        }
    }
    tracing::info!("Socket listener stopped");
}

/// Periodically expire one-shot subscriptions
pub async fn expiry_sweeper(dispatcher: Arc<NotificationDispatcher>, interval: Duration) {
    tracing::info!(?interval, "Starting expiry sweeper");
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let expired = dispatcher.sweep_expired().await;
        if expired > 0 {
            tracing::debug!(expired, "Sweep finished");
        }
    }
}
