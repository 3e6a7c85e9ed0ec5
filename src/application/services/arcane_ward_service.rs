//! Arcane Ward Service - Entry point wiring host notifications to the engine
//!
//! Constructed once per process from the outbound ports and registered on a
//! notification dispatcher, once per notification kind. Socket envelopes
//! from other participants arrive through `handle_socket_message`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::application::dto::SocketMessage;
use crate::application::errors::WardError;
use crate::application::ports::WardPorts;
use crate::application::services::chat_relay_service::ChatRelayService;
use crate::application::services::confirmation_service::{Confirmation, ConfirmationService};
use crate::application::services::damage_interception_service::{
    DamageInterceptionService, Interception, SkipReason,
};
use crate::application::services::narrative_composer::{keys, NarrativeComposer};
use crate::application::services::notification_dispatcher::{
    NotificationDispatcher, NotificationHandler,
};
use crate::application::services::projected_ward_service::{ProjectedGrant, ProjectedWardService};
use crate::application::services::replenishment_service::{ReplenishOutcome, ReplenishmentService};
use crate::application::services::ward_store::WardStore;
use crate::domain::entities::{ActorKind, Character, ItemKind};
use crate::domain::events::{
    ActionResolved, AttackResolved, DamageAboutToApply, Notification, NotificationKind,
    RestCompleted, RestType, SheetRendered,
};
use crate::domain::services::{
    has_protective_effect, is_charging_action, is_ward_bearer, ward_feature,
};
use crate::domain::value_objects::{CharacterId, ItemId, SubscriptionId, WardRules};

/// Tunables handed to the engine at construction
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub rules: WardRules,
    /// Deadline for a remote participant to answer a confirmation
    pub confirmation_timeout: Duration,
    /// Lifetime of an unused projected ward
    pub projection_expiry: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rules: WardRules::default(),
            confirmation_timeout: Duration::from_secs(30),
            projection_expiry: Duration::from_secs(60),
        }
    }
}

/// What a resolved action did to the ward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Ignored,
    WardCreated,
    WardDeclined,
    Replenished(ReplenishOutcome),
}

pub struct ArcaneWardService {
    ports: WardPorts,
    rules: Arc<WardRules>,
    composer: NarrativeComposer,
    store: WardStore,
    chat: ChatRelayService,
    confirmations: Arc<ConfirmationService>,
    interception: DamageInterceptionService,
    replenishment: ReplenishmentService,
    projected: ProjectedWardService,
}

impl ArcaneWardService {
    pub fn new(ports: WardPorts, settings: EngineSettings) -> Arc<Self> {
        let rules = Arc::new(settings.rules);
        let composer = NarrativeComposer::new(ports.localization.clone(), ports.random.clone());
        let store = WardStore::new(ports.host.clone(), composer.clone(), rules.clone());
        let chat = ChatRelayService::new(&ports);
        let confirmations = Arc::new(ConfirmationService::new(
            &ports,
            composer.clone(),
            settings.confirmation_timeout,
        ));
        let interception = DamageInterceptionService::new(
            store.clone(),
            composer.clone(),
            chat.clone(),
            rules.clone(),
        );
        let replenishment = ReplenishmentService::new(store.clone(), composer.clone(), chat.clone());
        let projected = ProjectedWardService::new(
            &ports,
            store.clone(),
            composer.clone(),
            chat.clone(),
            confirmations.clone(),
            rules.clone(),
            settings.projection_expiry,
        );

        Arc::new(Self {
            ports,
            rules,
            composer,
            store,
            chat,
            confirmations,
            interception,
            replenishment,
            projected,
        })
    }

    /// Subscribe this service to every notification kind it consumes
    pub async fn register(self: &Arc<Self>, dispatcher: &NotificationDispatcher) -> Vec<SubscriptionId> {
        let kinds = [
            NotificationKind::ActionResolved,
            NotificationKind::AttackResolved,
            NotificationKind::DamageAboutToApply,
            NotificationKind::RestCompleted,
            NotificationKind::SheetRendered,
        ];
        let mut ids = Vec::with_capacity(kinds.len());
        for kind in kinds {
            ids.push(dispatcher.subscribe(kind, self.clone()).await);
        }
        info!("Arcane ward handlers registered");
        ids
    }

    fn acts_as_coordinator(&self) -> bool {
        let participants = &self.ports.participants;
        participants.is_coordinator() || !participants.coordinator_connected()
    }

    fn may_write(&self, character: CharacterId) -> bool {
        let allowed = self.ports.participants.has_mutation_rights(character);
        if !allowed {
            debug!(%character, "No mutation rights on character");
        }
        allowed
    }

    /// Establish the ward on every player character that should carry one
    ///
    /// Returns the number of characters reconciled.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<usize, WardError> {
        let characters = self.ports.host.list_characters().await?;
        let mut reconciled = 0;
        for character in &characters {
            if character.kind != ActorKind::Character
                || !is_ward_bearer(character, &self.rules)
                || has_protective_effect(character, &self.rules)
                || !self.may_write(character.id)
            {
                continue;
            }
            if ward_feature(character, &self.rules).is_none() {
                warn!(character = %character.name, "Bearer is missing the ward feature");
                let notice = self.composer.announcement(
                    character.id,
                    keys::MISSING_FEATURE,
                    &[("actor", character.name.as_str())],
                );
                self.chat.send(notice, false).await?;
                continue;
            }
            if self.store.create_resource(character).await?.is_some() {
                reconciled += 1;
            }
        }
        info!(reconciled, total = characters.len(), "Startup reconciliation complete");
        Ok(reconciled)
    }

    #[instrument(skip(self, action), fields(actor = %action.actor, item = %action.item.name))]
    pub async fn on_action_resolved(&self, action: &ActionResolved) -> Result<ActionOutcome, WardError> {
        if action.item.kind != ItemKind::Spell || !is_charging_action(&action.item, &self.rules) {
            return Ok(ActionOutcome::Ignored);
        }
        let actor = self.store.character(action.actor).await?;
        if actor.kind != ActorKind::Character
            || !is_ward_bearer(&actor, &self.rules)
            || !self.may_write(actor.id)
        {
            return Ok(ActionOutcome::Ignored);
        }

        if !has_protective_effect(&actor, &self.rules) {
            let confirmation = Confirmation::create_ward(actor.id, action.item.name.clone());
            let answer = self.confirmations.confirm(actor.id, confirmation).await;
            if !answer.is_yes() {
                info!("Ward creation declined");
                return Ok(ActionOutcome::WardDeclined);
            }
            return Ok(if self.create_ward(&actor).await? {
                ActionOutcome::WardCreated
            } else {
                ActionOutcome::Ignored
            });
        }

        let outcome = self.replenishment.replenish(&actor, &action.item).await?;
        Ok(ActionOutcome::Replenished(outcome))
    }

    /// Place a fresh instance of the ward template on the bearer
    async fn create_ward(&self, actor: &Character) -> Result<bool, WardError> {
        let Some(template) = self.store.create_resource(actor).await? else {
            return Ok(false);
        };
        let effect = template.instantiate();
        let effect_id = effect.id;
        self.ports
            .host
            .create_character_effect(actor.id, effect)
            .await?;
        info!(effect = %effect_id, "Ward created");

        if self.store.resource(actor).is_some_and(|r| r.verbose_messaging) {
            let notice = self.composer.announcement(
                actor.id,
                keys::EFFECT_CREATED,
                &[("actor", actor.name.as_str())],
            );
            self.chat.send(notice, false).await?;
        }
        Ok(true)
    }

    pub async fn on_attack_resolved(
        &self,
        attack: &AttackResolved,
        dispatcher: &NotificationDispatcher,
    ) -> Result<Option<ProjectedGrant>, WardError> {
        if !self.acts_as_coordinator() {
            return Ok(None);
        }
        self.projected.on_attack(attack, dispatcher).await
    }

    pub async fn on_damage(&self, notification: &mut DamageAboutToApply) -> Result<Interception, WardError> {
        if !self.may_write(notification.damage.target) {
            return Ok(Interception::Skipped(SkipReason::NotWarded));
        }
        self.interception.intercept(&mut notification.damage).await
    }

    /// Long rests restore the ward to full
    #[instrument(skip(self, rest), fields(actor = %rest.actor, rest = ?rest.rest))]
    pub async fn on_rest_completed(&self, rest: &RestCompleted) -> Result<bool, WardError> {
        if rest.rest != RestType::Long || !self.may_write(rest.actor) {
            return Ok(false);
        }
        let actor = self.store.character(rest.actor).await?;
        if !has_protective_effect(&actor, &self.rules) {
            return Ok(false);
        }
        let Some(resource) = self.store.resource(&actor) else {
            return Ok(false);
        };
        self.store.set_spent(&resource, 0).await?;
        info!("Ward restored by long rest");

        if resource.verbose_messaging {
            let notice = self.composer.announcement(
                actor.id,
                keys::LONG_REST,
                &[("actor", actor.name.as_str())],
            );
            self.chat.send(notice, false).await?;
        }
        Ok(true)
    }

    /// Append the verbose messaging toggle to the ward feature's sheet
    pub fn on_sheet_rendered(&self, sheet: &mut SheetRendered) {
        let item = &sheet.item;
        if item.kind == ItemKind::Feat && item.name.contains(&self.rules.ward_feature) {
            sheet.controls.push(self.composer.verbose_toggle(item));
        }
    }

    /// Flip and persist the verbose messaging flag on an item
    #[instrument(skip(self))]
    pub async fn toggle_verbose_messaging(
        &self,
        character: CharacterId,
        item: ItemId,
    ) -> Result<bool, WardError> {
        let actor = self.store.character(character).await?;
        let feature = actor
            .item(item)
            .ok_or(WardError::ItemNotFound { character, item })?;
        let mut flags = feature.flags;
        flags.verbose_messaging = !flags.verbose_messaging;
        self.ports.host.set_item_flags(character, item, flags).await?;
        info!(enabled = flags.verbose_messaging, "Toggled verbose messaging");
        Ok(flags.verbose_messaging)
    }

    /// React to an envelope from another participant
    #[instrument(skip(self, message), fields(kind = message.type_name()))]
    pub async fn handle_socket_message(&self, message: SocketMessage) -> Result<(), WardError> {
        match message {
            SocketMessage::CreateDialog { user, payload } => {
                self.confirmations.answer_remote_request(user, payload).await?;
            }
            SocketMessage::DialogResult { payload } => {
                self.confirmations.handle_dialog_result(payload).await;
            }
            SocketMessage::SendMessage { payload } => {
                self.chat.handle_send_request(payload).await?;
            }
            SocketMessage::SayBubble { payload } => {
                self.chat.handle_say_bubble(payload).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationHandler for ArcaneWardService {
    async fn handle(
        &self,
        notification: &mut Notification,
        dispatcher: &NotificationDispatcher,
    ) -> Result<(), WardError> {
        match notification {
            Notification::ActionResolved(n) => {
                self.on_action_resolved(n).await?;
            }
            Notification::AttackResolved(n) => {
                self.on_attack_resolved(n, dispatcher).await?;
            }
            Notification::DamageAboutToApply(n) => {
                self.on_damage(n).await?;
            }
            Notification::RestCompleted(n) => {
                self.on_rest_completed(n).await?;
            }
            Notification::SheetRendered(n) => self.on_sheet_rendered(n),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        bearer, hit, projector, wait_for_messages, warded, Harness, Seat,
    };
    use crate::domain::entities::Item;
    use crate::domain::events::{AttackTarget, SheetControl};
    use crate::domain::value_objects::{DialogAnswer, ParticipantRole};
    use crate::infrastructure::workers::socket_listener;

    async fn engine(seat: &Seat) -> (Arc<ArcaneWardService>, NotificationDispatcher) {
        let service = ArcaneWardService::new(seat.ports.clone(), EngineSettings::default());
        let dispatcher = NotificationDispatcher::new();
        service.register(&dispatcher).await;
        (service, dispatcher)
    }

    fn cast(actor: &Character, spell: Item) -> Notification {
        Notification::ActionResolved(ActionResolved {
            actor: actor.id,
            item: spell,
        })
    }

    #[tokio::test]
    async fn test_initialize_reconciles_bearers() {
        let harness = Harness::new();
        let gm = harness.seat(ParticipantRole::GameMaster);
        let mira = bearer("Mira", 6, 10);
        let tomas = warded("Tomas", 4, 10);
        let mut featureless = bearer("Quill", 0, 10);
        featureless.items.retain(|i| i.kind != ItemKind::Feat);
        let mut npc = bearer("Archmage", 5, 10);
        npc.kind = ActorKind::Npc;
        for c in [&mira, &tomas, &featureless, &npc] {
            harness.host.insert(c.clone()).await;
        }
        let (service, _) = engine(&gm).await;

        assert_eq!(service.initialize().await.unwrap(), 1);

        let store = harness.store();
        assert_eq!(store.get_resource(mira.id).await.unwrap().unwrap().spent(), 0);
        assert_eq!(store.get_resource(tomas.id).await.unwrap().unwrap().spent(), 4);
        assert_eq!(store.get_resource(npc.id).await.unwrap().unwrap().spent(), 5);
        let messages = harness.host.messages().await;
        assert_eq!(messages.len(), 1);
        assert!(messages[0].content.contains("no Arcane Ward feature"));
    }

    #[tokio::test]
    async fn test_first_charging_spell_offers_to_create_ward() {
        let harness = Harness::new();
        let gm = harness.seat(ParticipantRole::GameMaster);
        let mira = bearer("Mira", 6, 10);
        harness.host.insert(mira.clone()).await;
        gm.dialogs.push_answer(DialogAnswer::Yes);
        let (service, _) = engine(&gm).await;

        let Notification::ActionResolved(action) = cast(&mira, Item::spell("Shield", 1, "abj")) else {
            unreachable!()
        };
        let outcome = service.on_action_resolved(&action).await.unwrap();

        assert_eq!(outcome, ActionOutcome::WardCreated);
        let after = harness.host.snapshot(mira.id).await.unwrap();
        assert!(has_protective_effect(&after, &WardRules::default()));
        assert_eq!(harness.store().resource(&after).unwrap().current(), 10);
        let messages = harness.host.messages().await;
        assert!(messages[0].content.contains("settles around"));
    }

    #[tokio::test]
    async fn test_declined_creation_leaves_bearer_unwarded() {
        let harness = Harness::new();
        let gm = harness.seat(ParticipantRole::GameMaster);
        let mira = bearer("Mira", 6, 10);
        harness.host.insert(mira.clone()).await;
        let (_service, dispatcher) = engine(&gm).await;

        dispatcher
            .dispatch(&mut cast(&mira, Item::spell("Shield", 1, "abj")))
            .await;

        let after = harness.host.snapshot(mira.id).await.unwrap();
        assert!(after.effects.is_empty());
        assert_eq!(harness.store().resource(&after).unwrap().spent(), 6);
        assert_eq!(gm.dialogs.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_charging_spell_replenishes_warded_bearer() {
        let harness = Harness::new();
        let gm = harness.seat(ParticipantRole::GameMaster);
        let mira = warded("Mira", 6, 10);
        harness.host.insert(mira.clone()).await;
        let (service, _) = engine(&gm).await;

        let Notification::ActionResolved(action) = cast(&mira, Item::spell("Counterspell", 3, "Abjuration")) else {
            unreachable!()
        };
        let outcome = service.on_action_resolved(&action).await.unwrap();

        assert_eq!(
            outcome,
            ActionOutcome::Replenished(ReplenishOutcome::Restored {
                restored: 6,
                current: 10
            })
        );
        assert!(gm.dialogs.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_other_actions_are_ignored() {
        let harness = Harness::new();
        let gm = harness.seat(ParticipantRole::GameMaster);
        let mira = warded("Mira", 6, 10);
        let mut archmage = warded("Archmage", 6, 10);
        archmage.kind = ActorKind::Npc;
        harness.host.insert(mira.clone()).await;
        harness.host.insert(archmage.clone()).await;
        let (service, _) = engine(&gm).await;

        for (actor, item) in [
            (&mira, Item::spell("Fireball", 3, "evo")),
            (&mira, Item::new("Longsword", ItemKind::Weapon)),
            (&archmage, Item::spell("Shield", 1, "abj")),
        ] {
            let action = ActionResolved {
                actor: actor.id,
                item,
            };
            assert_eq!(
                service.on_action_resolved(&action).await.unwrap(),
                ActionOutcome::Ignored
            );
        }
    }

    #[tokio::test]
    async fn test_damage_notification_is_rewritten_through_dispatcher() {
        let harness = Harness::new();
        let gm = harness.seat(ParticipantRole::GameMaster);
        let mira = warded("Mira", 0, 10);
        harness.host.insert(mira.clone()).await;
        let (_service, dispatcher) = engine(&gm).await;

        let mut notification = Notification::DamageAboutToApply(DamageAboutToApply {
            damage: hit(mira.id, None, 12),
        });
        dispatcher.dispatch(&mut notification).await;

        let Notification::DamageAboutToApply(n) = notification else {
            unreachable!()
        };
        assert_eq!(n.damage.total_damage, 2);
    }

    #[tokio::test]
    async fn test_player_without_rights_leaves_damage_alone() {
        let harness = Harness::new();
        let _gm = harness.seat(ParticipantRole::GameMaster);
        let player = harness.seat(ParticipantRole::Player);
        let mira = warded("Mira", 0, 10);
        harness.host.insert(mira.clone()).await;
        let (service, _) = engine(&player).await;

        let mut damage = DamageAboutToApply {
            damage: hit(mira.id, None, 12),
        };
        service.on_damage(&mut damage).await.unwrap();

        assert_eq!(damage.damage.total_damage, 12);
    }

    #[tokio::test]
    async fn test_long_rest_restores_and_short_rest_does_not() {
        let harness = Harness::new();
        let gm = harness.seat(ParticipantRole::GameMaster);
        let mira = warded("Mira", 8, 10);
        harness.host.insert(mira.clone()).await;
        let (service, _) = engine(&gm).await;

        let short = RestCompleted {
            actor: mira.id,
            rest: RestType::Short,
        };
        assert!(!service.on_rest_completed(&short).await.unwrap());

        let long = RestCompleted {
            actor: mira.id,
            rest: RestType::Long,
        };
        assert!(service.on_rest_completed(&long).await.unwrap());
        let stored = harness.store().get_resource(mira.id).await.unwrap().unwrap();
        assert_eq!(stored.current(), 10);
        assert!(harness.host.messages().await[0].content.contains("long rest"));
    }

    #[derive(Debug, Clone, Copy)]
    enum Step {
        Hit(u32),
        Cast(u8),
        LongRest,
    }

    #[tokio::test]
    async fn test_pool_stays_within_bounds_across_mixed_events() {
        let harness = Harness::new();
        let gm = harness.seat(ParticipantRole::GameMaster);
        let mira = warded("Mira", 3, 10);
        harness.host.insert(mira.clone()).await;
        let (service, _) = engine(&gm).await;
        let store = harness.store();

        let steps = [
            Step::Hit(4),
            Step::Cast(1),
            Step::Hit(25),
            Step::Hit(3),
            Step::Cast(3),
            Step::Cast(9),
            Step::Hit(0),
            Step::LongRest,
            Step::Hit(7),
            Step::Cast(0),
            Step::Cast(2),
            Step::Hit(12),
            Step::LongRest,
            Step::LongRest,
        ];
        for step in steps {
            let before = store.get_resource(mira.id).await.unwrap().unwrap();
            match step {
                Step::Hit(amount) => {
                    let mut damage = DamageAboutToApply {
                        damage: hit(mira.id, None, amount),
                    };
                    let outcome = service.on_damage(&mut damage).await.unwrap();
                    if let Interception::Absorbed(absorption) = outcome {
                        assert_eq!(absorption.absorbed + absorption.remaining, amount, "{step:?}");
                        assert_eq!(damage.damage.total_damage, absorption.remaining, "{step:?}");
                        assert!(absorption.absorbed <= before.current(), "{step:?}");
                    }
                }
                Step::Cast(level) => {
                    let action = ActionResolved {
                        actor: mira.id,
                        item: Item::spell("Shield", level, "abj"),
                    };
                    service.on_action_resolved(&action).await.unwrap();
                }
                Step::LongRest => {
                    let rest = RestCompleted {
                        actor: mira.id,
                        rest: RestType::Long,
                    };
                    service.on_rest_completed(&rest).await.unwrap();
                }
            }

            let after = store.get_resource(mira.id).await.unwrap().unwrap();
            assert_eq!(after.max(), 10, "{step:?}");
            assert!(after.current() <= after.max(), "{step:?}");
            assert!(after.spent() <= after.max(), "{step:?}");
            assert_eq!(after.current() + after.spent(), after.max(), "{step:?}");
        }

        let end = store.get_resource(mira.id).await.unwrap().unwrap();
        assert_eq!(end.current(), 10);
    }

    #[tokio::test]
    async fn test_sheet_toggle_round_trip() {
        let harness = Harness::new();
        let gm = harness.seat(ParticipantRole::GameMaster);
        let mira = warded("Mira", 0, 10);
        harness.host.insert(mira.clone()).await;
        let (service, dispatcher) = engine(&gm).await;
        let feature = mira.find_item(ItemKind::Feat, "Arcane Ward").unwrap().clone();

        assert!(!service
            .toggle_verbose_messaging(mira.id, feature.id)
            .await
            .unwrap());

        let refreshed = harness.host.snapshot(mira.id).await.unwrap();
        let feature = refreshed.item(feature.id).unwrap().clone();
        let mut notification = Notification::SheetRendered(SheetRendered {
            character: mira.id,
            item: feature.clone(),
            controls: Vec::new(),
        });
        dispatcher.dispatch(&mut notification).await;

        let Notification::SheetRendered(sheet) = notification else {
            unreachable!()
        };
        assert_eq!(
            sheet.controls,
            vec![SheetControl {
                item: feature.id,
                title: "Toggle Messages".to_string(),
                label: "Disabled".to_string(),
                enabled: false,
            }]
        );

        let mut weapon_sheet = SheetRendered {
            character: mira.id,
            item: Item::new("Dagger", ItemKind::Weapon),
            controls: Vec::new(),
        };
        service.on_sheet_rendered(&mut weapon_sheet);
        assert!(weapon_sheet.controls.is_empty());
    }

    #[tokio::test]
    async fn test_projection_confirmed_by_remote_player() {
        let harness = Harness::new();
        let mut gm = harness.seat(ParticipantRole::GameMaster);
        let mut player = harness.seat(ParticipantRole::Player);
        let mira = projector("Mira", 0, 10);
        let brak = Character::new("Brak", ActorKind::Character);
        let ogre = Character::new("Ogre", ActorKind::Npc);
        for c in [&ogre, &mira, &brak] {
            harness.host.insert(c.clone()).await;
        }
        harness.host.place(mira.id, 0.0, 0.0);
        harness.host.place(brak.id, 10.0, 0.0);
        harness.roster.grant_ownership(mira.id, player.participant);
        player.dialogs.push_answer(DialogAnswer::Yes);

        let (gm_engine, gm_dispatcher) = engine(&gm).await;
        let (player_engine, _) = engine(&player).await;
        tokio::spawn(socket_listener(gm_engine.clone(), gm.take_inbox()));
        tokio::spawn(socket_listener(player_engine.clone(), player.take_inbox()));

        let mut attack = Notification::AttackResolved(AttackResolved {
            attacker: ogre.id,
            item_name: "Greatclub".to_string(),
            targets: vec![AttackTarget {
                target: brak.id,
                hit: true,
            }],
        });
        gm_dispatcher.dispatch(&mut attack).await;

        let shielded = harness.host.snapshot(brak.id).await.unwrap();
        assert_eq!(shielded.effects.len(), 1);
        assert!(gm.dialogs.prompts().is_empty());
        assert_eq!(player.dialogs.prompts().len(), 1);

        let mut damage = Notification::DamageAboutToApply(DamageAboutToApply {
            damage: hit(brak.id, Some(ogre.id), 7),
        });
        gm_dispatcher.dispatch(&mut damage).await;

        let Notification::DamageAboutToApply(n) = damage else {
            unreachable!()
        };
        assert_eq!(n.damage.total_damage, 0);
        let mira_ward = harness.store().get_resource(mira.id).await.unwrap().unwrap();
        assert_eq!(mira_ward.current(), 3);
        assert!(harness.host.snapshot(brak.id).await.unwrap().effects.is_empty());
    }

    #[tokio::test]
    async fn test_player_narrative_is_created_by_coordinator() {
        let harness = Harness::new();
        let mut gm = harness.seat(ParticipantRole::GameMaster);
        let player = harness.seat(ParticipantRole::Player);
        let mira = warded("Mira", 6, 10);
        harness.host.insert(mira.clone()).await;
        harness.roster.grant_ownership(mira.id, player.participant);

        let (gm_engine, _) = engine(&gm).await;
        let (_player_engine, player_dispatcher) = engine(&player).await;
        tokio::spawn(socket_listener(gm_engine, gm.take_inbox()));

        player_dispatcher
            .dispatch(&mut cast(&mira, Item::spell("Alarm", 1, "abj")))
            .await;

        let messages = wait_for_messages(&harness.host, 1).await;
        assert!(messages[0].content.contains("flows back"));
        let stored = harness.store().get_resource(mira.id).await.unwrap().unwrap();
        assert_eq!(stored.current(), 6);
    }
}
