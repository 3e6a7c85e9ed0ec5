//! Socket envelopes exchanged between participants
//!
//! Every envelope is JSON of the form `{ "type": ..., "user"?: ..., "payload": {...} }`.

use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::ChatMessage;
use crate::domain::value_objects::{
    CharacterId, DialogAnswer, DialogKind, MessageId, ParticipantId, RequestId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SocketMessage {
    /// Ask `user` to answer a confirmation locally
    CreateDialog {
        user: ParticipantId,
        payload: DialogRequest,
    },
    /// Answer to a `CreateDialog`, matched by the echoed request id
    DialogResult { payload: DialogResultPayload },
    /// Ask the coordinator to create a chat message
    SendMessage { payload: SendMessageRequest },
    /// Show an already created message as a speech bubble
    SayBubble { payload: BubbleRequest },
}

impl SocketMessage {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CreateDialog { .. } => "createDialog",
            Self::DialogResult { .. } => "dialogResult",
            Self::SendMessage { .. } => "sendMessage",
            Self::SayBubble { .. } => "sayBubble",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: DialogKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<CharacterId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attacker_id: Option<CharacterId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<CharacterId>,
    pub request_id: RequestId,
    /// Seconds before the remote prompt auto-dismisses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogResultPayload {
    pub result: DialogAnswer,
    pub original_request: DialogRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub chat_data: ChatMessage,
    pub use_bubble: bool,
    pub actor_id: CharacterId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BubbleRequest {
    pub message_id: MessageId,
    pub actor_id: CharacterId,
}
