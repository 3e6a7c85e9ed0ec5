use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::HostError;
use crate::domain::value_objects::{CharacterId, MessageId};

/// Visibility/presentation mode of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollMode {
    PublicRoll,
    Emote,
}

/// A chat message ready for the host's messaging facility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub speaker: CharacterId,
    /// Lightweight markup
    pub content: String,
    pub mode: RollMode,
}

impl ChatMessage {
    pub fn announcement(speaker: CharacterId, content: impl Into<String>) -> Self {
        Self {
            speaker,
            content: content.into(),
            mode: RollMode::PublicRoll,
        }
    }

    pub fn emote(speaker: CharacterId, content: impl Into<String>) -> Self {
        Self {
            speaker,
            content: content.into(),
            mode: RollMode::Emote,
        }
    }
}

/// Port for the host's chat log and speech bubbles
#[async_trait]
pub trait ChatPort: Send + Sync {
    async fn create_message(&self, message: &ChatMessage) -> Result<MessageId, HostError>;

    /// Show an existing message as a bubble over the speaker's token
    async fn show_bubble(&self, speaker: CharacterId, message: MessageId) -> Result<(), HostError>;
}
