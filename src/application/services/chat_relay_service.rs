//! Chat Relay Service - Delivers narrative messages to the host chat log
//!
//! Only the coordinator creates chat messages while one is connected; other
//! participants ask it to over the broadcast channel. Speech bubbles are
//! shown locally by the creator and mirrored to everyone with `sayBubble`.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::dto::{BubbleRequest, SendMessageRequest, SocketMessage};
use crate::application::errors::WardError;
use crate::application::ports::outbound::{BroadcastPort, ChatMessage, ChatPort, ParticipantPort};
use crate::application::ports::WardPorts;
use crate::domain::value_objects::{CharacterId, MessageId};

#[derive(Clone)]
pub struct ChatRelayService {
    chat: Arc<dyn ChatPort>,
    participants: Arc<dyn ParticipantPort>,
    broadcast: Arc<dyn BroadcastPort>,
}

impl ChatRelayService {
    pub fn new(ports: &WardPorts) -> Self {
        Self {
            chat: ports.chat.clone(),
            participants: ports.participants.clone(),
            broadcast: ports.broadcast.clone(),
        }
    }

    fn creates_locally(&self) -> bool {
        self.participants.is_coordinator() || !self.participants.coordinator_connected()
    }

    /// Post a message; returns its id when it was created here
    #[instrument(skip(self, message), fields(speaker = %message.speaker))]
    pub async fn send(
        &self,
        message: ChatMessage,
        use_bubble: bool,
    ) -> Result<Option<MessageId>, WardError> {
        if !self.creates_locally() {
            debug!("Forwarding chat message to coordinator");
            let actor_id = message.speaker;
            self.broadcast.emit(SocketMessage::SendMessage {
                payload: SendMessageRequest {
                    chat_data: message,
                    use_bubble,
                    actor_id,
                },
            })?;
            return Ok(None);
        }

        let id = self.chat.create_message(&message).await?;
        if use_bubble {
            self.say_bubble(message.speaker, id).await?;
        }
        Ok(Some(id))
    }

    async fn say_bubble(&self, speaker: CharacterId, message_id: MessageId) -> Result<(), WardError> {
        self.chat.show_bubble(speaker, message_id).await?;
        self.broadcast.emit(SocketMessage::SayBubble {
            payload: BubbleRequest {
                message_id,
                actor_id: speaker,
            },
        })?;
        Ok(())
    }

    /// Create a message on behalf of another participant
    pub async fn handle_send_request(&self, request: SendMessageRequest) -> Result<(), WardError> {
        if !self.participants.is_coordinator() {
            debug!("Ignoring sendMessage, not the coordinator");
            return Ok(());
        }
        let id = self.chat.create_message(&request.chat_data).await?;
        if request.use_bubble {
            self.say_bubble(request.actor_id, id).await?;
        }
        Ok(())
    }

    pub async fn handle_say_bubble(&self, request: BubbleRequest) -> Result<(), WardError> {
        self.chat
            .show_bubble(request.actor_id, request.message_id)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::Harness;
    use crate::domain::value_objects::ParticipantRole;
    use crate::infrastructure::broadcast::Inbox;

    #[tokio::test]
    async fn test_coordinator_creates_and_mirrors_bubble() {
        let harness = Harness::new();
        let gm = harness.seat(ParticipantRole::GameMaster);
        let mut player = harness.seat(ParticipantRole::Player);
        let speaker = CharacterId::new();
        let relay = ChatRelayService::new(&gm.ports);

        let id = relay
            .send(ChatMessage::emote(speaker, "<p>Hah.</p>"), true)
            .await
            .unwrap();

        assert!(id.is_some());
        assert_eq!(harness.host.messages().await.len(), 1);
        assert_eq!(harness.host.bubbles().await, vec![(speaker, id.unwrap())]);
        match player.take_inbox().recv().await {
            Some(SocketMessage::SayBubble { payload }) => {
                assert_eq!(payload.actor_id, speaker);
            }
            other => panic!("Expected sayBubble, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_player_forwards_to_connected_coordinator() {
        let harness = Harness::new();
        let mut gm = harness.seat(ParticipantRole::GameMaster);
        let player = harness.seat(ParticipantRole::Player);
        let speaker = CharacterId::new();
        let message = ChatMessage::announcement(speaker, "<p>Ward up.</p>");

        let id = ChatRelayService::new(&player.ports)
            .send(message.clone(), false)
            .await
            .unwrap();

        assert!(id.is_none());
        assert!(harness.host.messages().await.is_empty());

        let Some(SocketMessage::SendMessage { payload }) = gm.take_inbox().recv().await else {
            panic!("Expected sendMessage");
        };
        let gm_relay = ChatRelayService::new(&gm.ports);
        gm_relay.handle_send_request(payload).await.unwrap();
        assert_eq!(harness.host.messages().await, vec![message]);
    }

    #[tokio::test]
    async fn test_player_creates_locally_without_coordinator() {
        let harness = Harness::new();
        let player = harness.seat(ParticipantRole::Player);

        let id = ChatRelayService::new(&player.ports)
            .send(ChatMessage::announcement(CharacterId::new(), "<p>Alone.</p>"), false)
            .await
            .unwrap();

        assert!(id.is_some());
        assert_eq!(harness.host.messages().await.len(), 1);
    }

    #[tokio::test]
    async fn test_send_request_ignored_by_player() {
        let harness = Harness::new();
        let _gm = harness.seat(ParticipantRole::GameMaster);
        let player = harness.seat(ParticipantRole::Player);
        let speaker = CharacterId::new();

        ChatRelayService::new(&player.ports)
            .handle_send_request(SendMessageRequest {
                chat_data: ChatMessage::announcement(speaker, "<p>Hi.</p>"),
                use_bubble: false,
                actor_id: speaker,
            })
            .await
            .unwrap();

        assert!(harness.host.messages().await.is_empty());
    }
}
