//! Projected Ward Service - Lends a bearer's ward to an attacked ally
//!
//! On a hit against a character without their own protective effect, the
//! first nearby bearer with a charged ward and the projection feature is
//! asked whether to step in. On yes, a distinct copy of their effect is
//! placed on the target and a one-shot handler takes the next damage
//! application against the target out of the bearer's pool. The copy is
//! removed after that single application, or when the handler expires.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::application::errors::WardError;
use crate::application::ports::outbound::{GeometryPort, HostDataPort, HostError};
use crate::application::ports::WardPorts;
use crate::application::services::chat_relay_service::ChatRelayService;
use crate::application::services::confirmation_service::{Confirmation, ConfirmationService};
use crate::application::services::damage_interception_service::{
    precheck, Interception, SkipReason,
};
use crate::application::services::narrative_composer::{keys, NarrativeComposer};
use crate::application::services::notification_dispatcher::{
    NotificationDispatcher, NotificationHandler,
};
use crate::application::services::ward_store::WardStore;
use crate::domain::entities::{Character, DamageEvent};
use crate::domain::events::{AttackResolved, Notification, NotificationKind};
use crate::domain::services::{
    has_projected_ward, has_protective_effect, is_ward_bearer, protective_effect,
};
use crate::domain::value_objects::{CharacterId, EffectId, SubscriptionId, WardRules};

/// A delegated effect waiting for the next hit on its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedGrant {
    /// Bearer whose pool absorbs the damage
    pub bearer: CharacterId,
    pub target: CharacterId,
    pub attacker: CharacterId,
    /// The copy placed on the target
    pub effect: EffectId,
    pub subscription: SubscriptionId,
}

enum Offer {
    NoCandidate,
    Declined,
    Granted(ProjectedGrant),
}

#[derive(Clone)]
pub struct ProjectedWardService {
    host: Arc<dyn HostDataPort>,
    geometry: Arc<dyn GeometryPort>,
    store: WardStore,
    composer: NarrativeComposer,
    chat: ChatRelayService,
    confirmations: Arc<ConfirmationService>,
    rules: Arc<WardRules>,
    expiry: Duration,
}

impl ProjectedWardService {
    pub fn new(
        ports: &WardPorts,
        store: WardStore,
        composer: NarrativeComposer,
        chat: ChatRelayService,
        confirmations: Arc<ConfirmationService>,
        rules: Arc<WardRules>,
        expiry: Duration,
    ) -> Self {
        Self {
            host: ports.host.clone(),
            geometry: ports.geometry.clone(),
            store,
            composer,
            chat,
            confirmations,
            rules,
            expiry,
        }
    }

    /// Offer protection to the hit targets of an attack
    ///
    /// At most one bearer is asked per attack: the first hit target with an
    /// eligible bearer settles it, whatever the answer.
    #[instrument(skip(self, attack, dispatcher), fields(attacker = %attack.attacker, item = %attack.item_name))]
    pub async fn on_attack(
        &self,
        attack: &AttackResolved,
        dispatcher: &NotificationDispatcher,
    ) -> Result<Option<ProjectedGrant>, WardError> {
        for target in attack.targets.iter().filter(|t| t.hit) {
            match self.offer(attack, target.target, dispatcher).await? {
                Offer::NoCandidate => continue,
                Offer::Declined => return Ok(None),
                Offer::Granted(grant) => return Ok(Some(grant)),
            }
        }
        Ok(None)
    }

    async fn offer(
        &self,
        attack: &AttackResolved,
        target_id: CharacterId,
        dispatcher: &NotificationDispatcher,
    ) -> Result<Offer, WardError> {
        let target = self.store.character(target_id).await?;
        if has_protective_effect(&target, &self.rules) {
            debug!(target = %target.name, "Target already warded");
            return Ok(Offer::NoCandidate);
        }

        let Some(candidate) = self.select_candidate(attack.attacker, &target).await? else {
            debug!(target = %target.name, "No bearer can project a ward");
            return Ok(Offer::NoCandidate);
        };
        let Some(effect) = protective_effect(&candidate, &self.rules).cloned() else {
            return Ok(Offer::NoCandidate);
        };

        let confirmation = Confirmation::projected_ward(
            candidate.id,
            attack.attacker,
            target.id,
            attack.item_name.clone(),
        );
        let answer = self.confirmations.confirm(candidate.id, confirmation).await;
        if !answer.is_yes() {
            info!(bearer = %candidate.name, target = %target.name, "Projection declined");
            return Ok(Offer::Declined);
        }

        let copy = effect.delegated_copy(candidate.id);
        let effect_id = copy.id;
        self.host.create_character_effect(target.id, copy).await?;
        info!(bearer = %candidate.name, target = %target.name, effect = %effect_id, "Projected ward onto target");

        if self.is_verbose(&candidate) {
            let applied = self.composer.announcement(
                candidate.id,
                keys::PROJECTED_APPLIED,
                &[
                    ("actor", candidate.name.as_str()),
                    ("target", target.name.as_str()),
                ],
            );
            self.chat.send(applied, false).await?;
        }

        let mut grant = ProjectedGrant {
            bearer: candidate.id,
            target: target.id,
            attacker: attack.attacker,
            effect: effect_id,
            subscription: SubscriptionId::new(),
        };
        let handler = Arc::new(ProjectedWardHandler {
            grant,
            service: self.clone(),
        });
        grant.subscription = dispatcher
            .subscribe_once(
                NotificationKind::DamageAboutToApply,
                target.id,
                self.expiry,
                handler,
            )
            .await;
        Ok(Offer::Granted(grant))
    }

    /// First bearer, in host order, able to protect `target`
    async fn select_candidate(
        &self,
        attacker: CharacterId,
        target: &Character,
    ) -> Result<Option<Character>, WardError> {
        let characters = self.host.list_characters().await?;
        Ok(characters
            .into_iter()
            .find(|candidate| self.can_protect(candidate, attacker, target)))
    }

    fn can_protect(&self, candidate: &Character, attacker: CharacterId, target: &Character) -> bool {
        if candidate.id == attacker || candidate.id == target.id {
            return false;
        }
        if !is_ward_bearer(candidate, &self.rules) || !has_projected_ward(candidate, &self.rules) {
            return false;
        }
        let own_effect =
            protective_effect(candidate, &self.rules).is_some_and(|effect| !effect.is_delegated());
        if !own_effect {
            return false;
        }
        match self.store.resource(candidate) {
            Some(resource) if !resource.is_depleted() => {}
            _ => {
                debug!(candidate = %candidate.name, "Ward depleted or missing");
                return false;
            }
        }
        match self.geometry.distance(candidate.id, target.id) {
            Some(distance) if distance <= self.rules.projection_range => true,
            Some(distance) => {
                debug!(candidate = %candidate.name, distance, "Target out of range");
                false
            }
            None => {
                debug!(candidate = %candidate.name, "No line of effect to target");
                false
            }
        }
    }

    fn is_verbose(&self, bearer: &Character) -> bool {
        self.store
            .resource(bearer)
            .is_some_and(|resource| resource.verbose_messaging)
    }

    /// Absorb one damage application with the bearer's pool, then drop the copy
    #[instrument(skip(self, damage), fields(bearer = %grant.bearer, target = %grant.target))]
    pub async fn absorb(
        &self,
        grant: &ProjectedGrant,
        damage: &mut DamageEvent,
    ) -> Result<Interception, WardError> {
        let outcome = self.absorb_with_bearer(grant, damage).await;
        if let Err(e) = self.remove_copy(grant).await {
            warn!("Failed to remove projected ward: {}", e);
        }
        outcome
    }

    async fn absorb_with_bearer(
        &self,
        grant: &ProjectedGrant,
        damage: &mut DamageEvent,
    ) -> Result<Interception, WardError> {
        if let Some(reason) = precheck(damage) {
            debug!(?reason, "Projected ward consumed without absorbing");
            return Ok(Interception::Skipped(reason));
        }
        let bearer = self.store.character(grant.bearer).await?;
        let Some(resource) = self.store.resource(&bearer) else {
            return Ok(Interception::Skipped(SkipReason::NotWarded));
        };
        if resource.is_depleted() {
            return Ok(Interception::Skipped(SkipReason::Depleted));
        }

        let absorption = resource.absorb(damage.total_damage);
        self.store
            .set_spent(&resource, resource.spent() + absorption.absorbed)
            .await?;
        damage.overwrite_remaining(absorption.remaining);
        info!(
            absorbed = absorption.absorbed,
            remaining = absorption.remaining,
            "Projected ward absorbed damage"
        );

        if resource.verbose_messaging {
            let target = self.name_of(grant.target).await;
            let attacker = self.name_of(grant.attacker).await;
            let report = self.composer.projected_absorption(
                bearer.id,
                &bearer.name,
                &attacker,
                &target,
                &absorption,
            );
            self.chat.send(report, false).await?;
        }
        Ok(Interception::Absorbed(absorption))
    }

    async fn remove_copy(&self, grant: &ProjectedGrant) -> Result<(), WardError> {
        match self
            .host
            .delete_character_effect(grant.target, grant.effect)
            .await
        {
            Ok(()) => {
                debug!(effect = %grant.effect, "Removed projected ward");
                Ok(())
            }
            Err(HostError::EffectNotFound(_)) => {
                debug!(effect = %grant.effect, "Projected ward already gone");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn name_of(&self, id: CharacterId) -> String {
        match self.host.get_character(id).await {
            Ok(Some(character)) => character.name,
            _ => self.composer.text(keys::UNKNOWN_ATTACKER, &[]),
        }
    }
}

/// One-shot damage handler bound to a single grant
pub struct ProjectedWardHandler {
    grant: ProjectedGrant,
    service: ProjectedWardService,
}

#[async_trait]
impl NotificationHandler for ProjectedWardHandler {
    async fn handle(
        &self,
        notification: &mut Notification,
        _dispatcher: &NotificationDispatcher,
    ) -> Result<(), WardError> {
        if let Notification::DamageAboutToApply(n) = notification {
            self.service.absorb(&self.grant, &mut n.damage).await?;
        }
        Ok(())
    }

    async fn expired(&self) {
        info!(target = %self.grant.target, effect = %self.grant.effect, "Projected ward expired unused");
        if let Err(e) = self.service.remove_copy(&self.grant).await {
            warn!("Failed to remove expired projected ward: {}", e);
        }
    }
}
