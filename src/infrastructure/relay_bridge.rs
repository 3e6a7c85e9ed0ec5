//! Relay bridge - An in-process participant of a relay room
//!
//! Lets an engine running inside the relay process take a seat in a room
//! next to the websocket clients. Outgoing envelopes are serialized and
//! forwarded to the rest of the room; incoming frames are parsed back into
//! envelopes for the socket listener.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::dto::SocketMessage;
use crate::application::ports::outbound::{BroadcastError, BroadcastPort};
use crate::domain::value_objects::{ParticipantId, ParticipantRole};
use crate::infrastructure::broadcast::Inbox;
use crate::infrastructure::relay::validate_frame;
use crate::infrastructure::state::AppState;

/// Sending side of a bridged seat
pub struct RoomBroadcast {
    outbox: mpsc::UnboundedSender<String>,
}

impl BroadcastPort for RoomBroadcast {
    fn emit(&self, message: SocketMessage) -> Result<(), BroadcastError> {
        let kind = message.type_name();
        let text =
            serde_json::to_string(&message).map_err(|e| BroadcastError::Encode(e.to_string()))?;
        self.outbox.send(text).map_err(|_| BroadcastError::Closed)?;
        debug!(kind, "Queued envelope for relay room");
        Ok(())
    }
}

/// Receiving side of a bridged seat
pub struct RoomInbox {
    frames: mpsc::UnboundedReceiver<String>,
}

#[async_trait]
impl Inbox for RoomInbox {
    async fn recv(&mut self) -> Option<SocketMessage> {
        while let Some(text) = self.frames.recv().await {
            match validate_frame(&text) {
                Ok(message) => return Some(message),
                Err(notice) => warn!(?notice, "Dropping frame the engine cannot read"),
            }
        }
        None
    }
}

/// Join `room` as `participant` and return both ends of the seat
///
/// The seat stays in the room until its `RoomBroadcast` is dropped; the
/// inbox then drains to `None`.
pub async fn attach(
    state: Arc<AppState>,
    room: &str,
    participant: ParticipantId,
    role: ParticipantRole,
) -> (RoomBroadcast, RoomInbox) {
    let (member_tx, frames) = mpsc::unbounded_channel();
    let members = state
        .rooms
        .write()
        .await
        .join(room, participant, role, member_tx.clone());
    info!(%room, %participant, ?role, members, "Engine joined relay room");

    let (outbox, mut pending) = mpsc::unbounded_channel::<String>();
    let room = room.to_string();
    tokio::spawn(async move {
        while let Some(text) = pending.recv().await {
            let delivered = state.rooms.read().await.forward(&room, participant, &text);
            debug!(%room, delivered, "Relayed engine envelope");
        }
        if state
            .rooms
            .write()
            .await
            .leave(&room, participant, &member_tx)
            .is_some()
        {
            info!(%room, %participant, "Engine left relay room");
        }
    });

    (RoomBroadcast { outbox }, RoomInbox { frames })
}
