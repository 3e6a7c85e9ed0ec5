//! Shared fixtures for service tests
//!
//! A `Harness` is one session: a shared in-memory host, roster and broadcast
//! hub. Each `Seat` is one participant's process attached to it.

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::outbound::{ChatMessage, LocalizationPort};
use crate::application::ports::WardPorts;
use crate::application::services::{
    ChatRelayService, ConfirmationService, DamageInterceptionService, NarrativeComposer,
    ProjectedWardService, ReplenishmentService, WardStore,
};
use crate::domain::entities::{
    ActiveEffect, Activity, ActorKind, Character, DamageComponent, DamageEvent, DamageType, Item,
    ItemKind,
};
use crate::domain::value_objects::{CharacterId, ParticipantId, ParticipantRole, WardRules};
use crate::infrastructure::broadcast::{HubReceiver, LocalBroadcastHub};
use crate::infrastructure::localization::PhraseCatalog;
use crate::infrastructure::memory_host::{InMemoryHost, ScriptedDialogs};
use crate::infrastructure::participants::SessionRoster;
use crate::infrastructure::random_adapter::ThreadRandom;

pub fn catalog() -> Arc<dyn LocalizationPort> {
    Arc::new(PhraseCatalog::bundled().expect("bundled catalog is valid"))
}

pub struct Harness {
    pub host: Arc<InMemoryHost>,
    pub roster: SessionRoster,
    pub hub: LocalBroadcastHub,
    pub rules: Arc<WardRules>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            host: Arc::new(InMemoryHost::new()),
            roster: SessionRoster::new(),
            hub: LocalBroadcastHub::default(),
            rules: Arc::new(WardRules::default()),
        }
    }

    /// Join a new participant and build its ports
    pub fn seat(&self, role: ParticipantRole) -> Seat {
        let participant = ParticipantId::new();
        self.roster.join(participant, role);
        let inbox = self.hub.subscribe(participant);
        let dialogs = Arc::new(ScriptedDialogs::new());
        Seat {
            participant,
            ports: self.ports_for(participant, dialogs.clone()),
            dialogs,
            inbox: Some(inbox),
        }
    }

    /// Ports for a participant that never joined; it acts alone
    fn detached_ports(&self) -> WardPorts {
        self.ports_for(ParticipantId::new(), Arc::new(ScriptedDialogs::new()))
    }

    fn ports_for(&self, participant: ParticipantId, dialogs: Arc<ScriptedDialogs>) -> WardPorts {
        WardPorts {
            host: self.host.clone(),
            geometry: self.host.clone(),
            participants: Arc::new(self.roster.view(participant)),
            broadcast: Arc::new(self.hub.endpoint(participant)),
            dialogs,
            chat: self.host.clone(),
            localization: catalog(),
            random: Arc::new(ThreadRandom::new()),
        }
    }

    pub fn store(&self) -> WardStore {
        Stack::new(&self.detached_ports(), self.rules.clone()).store
    }

    pub fn interception(&self) -> DamageInterceptionService {
        Stack::new(&self.detached_ports(), self.rules.clone()).interception
    }

    pub fn replenishment(&self) -> ReplenishmentService {
        Stack::new(&self.detached_ports(), self.rules.clone()).replenishment
    }
}

pub struct Seat {
    pub participant: ParticipantId,
    pub ports: WardPorts,
    pub dialogs: Arc<ScriptedDialogs>,
    inbox: Option<HubReceiver>,
}

impl Seat {
    pub fn composer(&self) -> NarrativeComposer {
        NarrativeComposer::new(self.ports.localization.clone(), self.ports.random.clone())
    }

    /// The envelopes addressed to this seat; can be taken once
    pub fn take_inbox(&mut self) -> HubReceiver {
        self.inbox.take().expect("inbox already taken")
    }
}

/// Every engine service built over one set of ports
pub struct Stack {
    pub ports: WardPorts,
    pub composer: NarrativeComposer,
    pub store: WardStore,
    pub chat: ChatRelayService,
    pub confirmations: Arc<ConfirmationService>,
    pub interception: DamageInterceptionService,
    pub replenishment: ReplenishmentService,
    pub projected: ProjectedWardService,
}

impl Stack {
    pub fn new(ports: &WardPorts, rules: Arc<WardRules>) -> Self {
        let composer = NarrativeComposer::new(ports.localization.clone(), ports.random.clone());
        let store = WardStore::new(ports.host.clone(), composer.clone(), rules.clone());
        let chat = ChatRelayService::new(ports);
        let confirmations = Arc::new(ConfirmationService::new(
            ports,
            composer.clone(),
            Duration::from_secs(30),
        ));
        let interception = DamageInterceptionService::new(
            store.clone(),
            composer.clone(),
            chat.clone(),
            rules.clone(),
        );
        let replenishment = ReplenishmentService::new(store.clone(), composer.clone(), chat.clone());
        let projected = ProjectedWardService::new(
            ports,
            store.clone(),
            composer.clone(),
            chat.clone(),
            confirmations.clone(),
            rules,
            Duration::from_secs(60),
        );
        Self {
            ports: ports.clone(),
            composer,
            store,
            chat,
            confirmations,
            interception,
            replenishment,
            projected,
        }
    }
}

/// An Abjurer with the ward feature but no ward effect applied
pub fn bearer(name: &str, spent: u32, max: u32) -> Character {
    let feature = Item::new("Arcane Ward", ItemKind::Feat)
        .with_description("A magical ward that absorbs damage.")
        .with_uses(spent, max)
        .with_activity(Activity::new("Create Ward"))
        .with_verbose_messaging(true);
    Character::new(name, ActorKind::Character)
        .with_item(Item::new("School of Abjuration (Abjurer)", ItemKind::Subclass))
        .with_item(feature)
}

/// A bearer whose ward is up
pub fn warded(name: &str, spent: u32, max: u32) -> Character {
    let character = bearer(name, spent, max);
    let feature = character
        .find_item(ItemKind::Feat, "Arcane Ward")
        .expect("bearer has the ward feature");
    let effect = ActiveEffect::ward_template(
        "Arcane Ward",
        "Arcane Ward",
        feature.description.clone(),
        WardRules::default().effect_icon,
        feature.id,
    );
    character.with_effect(effect)
}

/// A warded bearer who can also project the ward
pub fn projector(name: &str, spent: u32, max: u32) -> Character {
    warded(name, spent, max).with_item(Item::new("Projected Ward", ItemKind::Feat))
}

pub fn set_verbose(character: &mut Character, enabled: bool) {
    for item in character.items.iter_mut() {
        if item.kind == ItemKind::Feat && item.name.contains("Arcane Ward") {
            item.flags.verbose_messaging = enabled;
        }
    }
}

/// A single fire hit on `target`
pub fn hit(target: CharacterId, source: Option<CharacterId>, amount: u32) -> DamageEvent {
    DamageEvent::hit(
        target,
        source,
        vec![DamageComponent::new(DamageType::Fire, amount)],
    )
}

/// Wait until the host has logged at least `count` chat messages
pub async fn wait_for_messages(host: &InMemoryHost, count: usize) -> Vec<ChatMessage> {
    for _ in 0..200 {
        let messages = host.messages().await;
        if messages.len() >= count {
            return messages;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    host.messages().await
}
