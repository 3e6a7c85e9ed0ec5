use crate::application::dto::SocketMessage;

#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    #[error("Broadcast channel closed")]
    Closed,
    #[error("Failed to encode envelope: {0}")]
    Encode(String),
}

/// Fire-and-forget broadcast to every other participant of the session
pub trait BroadcastPort: Send + Sync {
    fn emit(&self, message: SocketMessage) -> Result<(), BroadcastError>;
}
