//! In-process broadcast hub
//!
//! Carries socket envelopes between participants running in one process.
//! Every envelope reaches every participant except its sender.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::application::dto::SocketMessage;
use crate::application::ports::outbound::{BroadcastError, BroadcastPort};
use crate::domain::value_objects::ParticipantId;

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
enum Frame {
    Message {
        from: ParticipantId,
        message: SocketMessage,
    },
    Close,
}

#[derive(Clone)]
pub struct LocalBroadcastHub {
    sender: broadcast::Sender<Frame>,
    closed: Arc<AtomicBool>,
}

impl Default for LocalBroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl LocalBroadcastHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Sending side for one participant
    pub fn endpoint(&self, participant: ParticipantId) -> HubEndpoint {
        HubEndpoint {
            hub: self.clone(),
            participant,
        }
    }

    /// Receiving side for one participant; sees envelopes sent from now on
    pub fn subscribe(&self, participant: ParticipantId) -> HubReceiver {
        HubReceiver {
            receiver: self.sender.subscribe(),
            participant,
        }
    }

    /// Stop the hub; receivers drain to `None` and further emits fail
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let _ = self.sender.send(Frame::Close);
    }
}

pub struct HubEndpoint {
    hub: LocalBroadcastHub,
    participant: ParticipantId,
}

impl BroadcastPort for HubEndpoint {
    fn emit(&self, message: SocketMessage) -> Result<(), BroadcastError> {
        if self.hub.closed.load(Ordering::SeqCst) {
            return Err(BroadcastError::Closed);
        }
        let kind = message.type_name();
        let frame = Frame::Message {
            from: self.participant,
            message,
        };
        match self.hub.sender.send(frame) {
            Ok(receivers) => debug!(kind, receivers, "Broadcast envelope"),
            Err(_) => debug!(kind, "Broadcast envelope with nobody listening"),
        }
        Ok(())
    }
}

/// Incoming envelopes for one participant
#[async_trait]
pub trait Inbox: Send {
    /// Next envelope from another participant; None once the source is gone
    async fn recv(&mut self) -> Option<SocketMessage>;
}

pub struct HubReceiver {
    receiver: broadcast::Receiver<Frame>,
    participant: ParticipantId,
}

#[async_trait]
impl Inbox for HubReceiver {
    async fn recv(&mut self) -> Option<SocketMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(Frame::Message { from, message }) => {
                    if from != self.participant {
                        return Some(message);
                    }
                }
                Ok(Frame::Close) | Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(participant = %self.participant, skipped, "Receiver lagged behind");
                }
            }
        }
    }
}
