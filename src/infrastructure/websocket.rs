//! WebSocket relay for socket envelopes
//!
//! Each connection joins one room and relays every valid envelope it sends
//! to the other members of that room. Nothing is echoed back to the sender.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::domain::value_objects::{ParticipantId, ParticipantRole};
use crate::infrastructure::relay::validate_frame;
use crate::infrastructure::state::AppState;

/// Query string of `GET /ws`
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectParams {
    pub room: String,
    pub participant: ParticipantId,
    pub role: ParticipantRole,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, params, state))
}

/// Handle an individual relay connection
async fn handle_socket(socket: WebSocket, params: ConnectParams, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let ConnectParams {
        room,
        participant,
        role,
    } = params;

    // Frames for this client, from other members or from the relay itself
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let (members, coordinator) = {
        let mut rooms = state.rooms.write().await;
        let members = rooms.join(&room, participant, role, tx.clone());
        (members, rooms.has_coordinator(&room))
    };
    tracing::info!(%room, %participant, ?role, members, "Participant joined relay room");
    if !coordinator {
        tracing::warn!(%room, "No game master connected to relay room");
    }

    let send_task = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match validate_frame(text.as_str()) {
                Ok(envelope) => {
                    let delivered = state
                        .rooms
                        .read()
                        .await
                        .forward(&room, participant, text.as_str());
                    tracing::debug!(
                        %room,
                        kind = envelope.type_name(),
                        delivered,
                        "Relayed envelope"
                    );
                }
                Err(notice) => {
                    tracing::warn!(%room, %participant, "Rejected malformed envelope");
                    match serde_json::to_string(&notice) {
                        Ok(json) => {
                            if tx.send(json).is_err() {
                                break;
                            }
                        }
                        Err(e) => tracing::error!("Failed to encode relay notice: {}", e),
                    }
                }
            },
            Ok(Message::Close(_)) => {
                tracing::debug!(%room, %participant, "Client closed the connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(%room, %participant, "WebSocket error: {}", e);
                break;
            }
        }
    }

    let (departure, rooms) = {
        let mut registry = state.rooms.write().await;
        let departure = registry.leave(&room, participant, &tx);
        (departure, registry.room_count())
    };
    if let Some(departure) = departure {
        tracing::info!(
            %room,
            %participant,
            connected_secs = departure.connected_for.num_seconds(),
            remaining = departure.remaining,
            rooms,
            "Participant left relay room"
        );
    }

    send_task.abort();
}
