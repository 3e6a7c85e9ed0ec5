//! Confirmation Service - Yes/no decisions from whoever controls a character
//!
//! When the local participant may answer for a character, the prompt is
//! shown here. Otherwise the question travels over the broadcast channel as
//! a `createDialog` envelope carrying a fresh request id, and the caller
//! awaits the matching `dialogResult`. Outstanding requests live in a
//! pending table of single-use completion handles; a deadline removes the
//! entry and resolves `No`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, instrument, warn};

use crate::application::dto::{DialogRequest, DialogResultPayload, SocketMessage};
use crate::application::errors::WardError;
use crate::application::ports::outbound::{
    BroadcastPort, DialogPort, DialogPrompt, HostDataPort, ParticipantPort, RandomPort,
};
use crate::application::ports::WardPorts;
use crate::application::services::narrative_composer::{keys, NarrativeComposer};
use crate::domain::value_objects::{
    CharacterId, DialogAnswer, DialogKind, ParticipantId, RequestId,
};

/// Where a confirmation gets answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Local,
    Remote(ParticipantId),
}

/// What to ask, before a request id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub kind: DialogKind,
    pub spell_name: Option<String>,
    pub actor: Option<CharacterId>,
    pub attacker: Option<CharacterId>,
    pub target: Option<CharacterId>,
}

impl Confirmation {
    pub fn create_ward(actor: CharacterId, spell_name: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::CreateWard,
            spell_name: Some(spell_name.into()),
            actor: Some(actor),
            attacker: None,
            target: None,
        }
    }

    pub fn projected_ward(
        bearer: CharacterId,
        attacker: CharacterId,
        target: CharacterId,
        spell_name: impl Into<String>,
    ) -> Self {
        Self {
            kind: DialogKind::ProjectedWard,
            spell_name: Some(spell_name.into()),
            actor: Some(bearer),
            attacker: Some(attacker),
            target: Some(target),
        }
    }

    fn into_request(self, request_id: RequestId, timeout: Option<u64>) -> DialogRequest {
        DialogRequest {
            spell_name: self.spell_name,
            kind: self.kind,
            actor_id: self.actor,
            attacker_id: self.attacker,
            target_id: self.target,
            request_id,
            timeout,
        }
    }
}

type PendingTable = HashMap<RequestId, oneshot::Sender<DialogAnswer>>;

/// Seconds between the remote prompt closing and the requester giving up
const REPLY_MARGIN_SECS: u64 = 5;

pub struct ConfirmationService {
    host: Arc<dyn HostDataPort>,
    participants: Arc<dyn ParticipantPort>,
    broadcast: Arc<dyn BroadcastPort>,
    dialogs: Arc<dyn DialogPort>,
    random: Arc<dyn RandomPort>,
    composer: NarrativeComposer,
    pending: Mutex<PendingTable>,
    timeout: Duration,
}

impl ConfirmationService {
    pub fn new(ports: &WardPorts, composer: NarrativeComposer, timeout: Duration) -> Self {
        Self {
            host: ports.host.clone(),
            participants: ports.participants.clone(),
            broadcast: ports.broadcast.clone(),
            dialogs: ports.dialogs.clone(),
            random: ports.random.clone(),
            composer,
            pending: Mutex::new(HashMap::new()),
            timeout,
        }
    }

    /// Decide who answers for `responder`
    pub fn route(&self, responder: CharacterId) -> Route {
        match self.participants.controlling_participant(responder) {
            Some(participant) if participant != self.participants.local_participant() => {
                Route::Remote(participant)
            }
            _ => Route::Local,
        }
    }

    /// Ask whoever controls `responder`; never fails, resolving `No` instead
    #[instrument(skip(self, confirmation), fields(kind = ?confirmation.kind))]
    pub async fn confirm(&self, responder: CharacterId, confirmation: Confirmation) -> DialogAnswer {
        match self.route(responder) {
            Route::Local => {
                let request = confirmation.into_request(RequestId::new(), None);
                self.prompt(&request, None).await
            }
            Route::Remote(participant) => self.request_remote(participant, confirmation).await,
        }
    }

    async fn request_remote(
        &self,
        participant: ParticipantId,
        confirmation: Confirmation,
    ) -> DialogAnswer {
        let request_id = RequestId::from_uuid(self.random.gen_uuid());
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(request_id, tx);

        let payload = confirmation.into_request(request_id, Some(self.remote_prompt_secs()));
        let message = SocketMessage::CreateDialog {
            user: participant,
            payload,
        };
        if let Err(e) = self.broadcast.emit(message) {
            warn!(%request_id, "Failed to send confirmation request: {}", e);
            self.pending.lock().await.remove(&request_id);
            return DialogAnswer::No;
        }
        info!(%request_id, %participant, "Awaiting remote confirmation");

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(answer)) => {
                info!(%request_id, ?answer, "Remote confirmation resolved");
                answer
            }
            Ok(Err(_)) => {
                warn!(%request_id, "Confirmation handle dropped");
                DialogAnswer::No
            }
            Err(_) => {
                self.pending.lock().await.remove(&request_id);
                warn!(%request_id, timeout = ?self.timeout, "Remote confirmation timed out");
                DialogAnswer::No
            }
        }
    }

    /// How long the remote prompt stays open; always inside the deadline
    fn remote_prompt_secs(&self) -> u64 {
        let deadline = self.timeout.as_secs();
        deadline
            .saturating_sub(REPLY_MARGIN_SECS)
            .max(deadline / 2)
            .max(1)
    }

    /// Resolve the pending request matching a `dialogResult`
    ///
    /// Returns false when no request with that id is outstanding.
    pub async fn handle_dialog_result(&self, payload: DialogResultPayload) -> bool {
        let request_id = payload.original_request.request_id;
        let Some(tx) = self.pending.lock().await.remove(&request_id) else {
            debug!(%request_id, "Ignoring result for unknown request");
            return false;
        };
        if tx.send(payload.result).is_err() {
            debug!(%request_id, "Requester stopped waiting");
        }
        true
    }

    /// Answer a `createDialog` addressed to the local participant
    ///
    /// Returns false when the request is meant for someone else.
    #[instrument(skip(self, request), fields(request_id = %request.request_id))]
    pub async fn answer_remote_request(
        &self,
        user: ParticipantId,
        request: DialogRequest,
    ) -> Result<bool, WardError> {
        if user != self.participants.local_participant() {
            debug!(%user, "Dialog request addressed to another participant");
            return Ok(false);
        }
        let timeout = request.timeout.map(Duration::from_secs);
        let result = self.prompt(&request, timeout).await;
        self.broadcast.emit(SocketMessage::DialogResult {
            payload: DialogResultPayload {
                result,
                original_request: request,
            },
        })?;
        info!(?result, "Answered remote confirmation");
        Ok(true)
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    async fn prompt(&self, request: &DialogRequest, timeout: Option<Duration>) -> DialogAnswer {
        let prompt = self.build_prompt(request, timeout).await;
        self.dialogs.confirm(prompt).await
    }

    async fn build_prompt(&self, request: &DialogRequest, timeout: Option<Duration>) -> DialogPrompt {
        let spell = request.spell_name.clone().unwrap_or_default();
        match request.kind {
            DialogKind::CreateWard => self.composer.create_ward_prompt(&spell, timeout),
            DialogKind::ProjectedWard => {
                let bearer = self.name_of(request.actor_id).await;
                let attacker = self.name_of(request.attacker_id).await;
                let target = self.name_of(request.target_id).await;
                self.composer
                    .projected_ward_prompt(&bearer, &attacker, &target, &spell, timeout)
            }
        }
    }

    async fn name_of(&self, id: Option<CharacterId>) -> String {
        let character = match id {
            Some(id) => self.host.get_character(id).await.ok().flatten(),
            None => None,
        };
        match character {
            Some(character) => character.name,
            None => self.composer.text(keys::UNKNOWN_ATTACKER, &[]),
        }
    }
}
