//! Damage Interception Service - Runs incoming damage through a bearer's ward
//!
//! The damage event is rewritten in place. Every precondition failure is a
//! normal skip, never an error; the event then reaches the host untouched.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::errors::WardError;
use crate::application::services::chat_relay_service::ChatRelayService;
use crate::application::services::narrative_composer::NarrativeComposer;
use crate::application::services::ward_store::WardStore;
use crate::domain::entities::{Absorption, Character, DamageEvent, WardResource};
use crate::domain::services::{is_ward_bearer, protective_effect};
use crate::domain::value_objects::{CharacterId, WardRules};

/// Why damage went past the ward untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    HealingOnly,
    Missed,
    NotWarded,
    Depleted,
    NoDamage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interception {
    Skipped(SkipReason),
    Absorbed(Absorption),
}

#[derive(Clone)]
pub struct DamageInterceptionService {
    store: WardStore,
    composer: NarrativeComposer,
    chat: ChatRelayService,
    rules: Arc<WardRules>,
}

impl DamageInterceptionService {
    pub fn new(
        store: WardStore,
        composer: NarrativeComposer,
        chat: ChatRelayService,
        rules: Arc<WardRules>,
    ) -> Self {
        Self {
            store,
            composer,
            chat,
            rules,
        }
    }

    /// Absorb as much of `damage` as the target's own ward allows
    ///
    /// The pool is persisted before the event is rewritten, so a failed
    /// write leaves the event as it arrived.
    #[instrument(skip(self, damage), fields(target = %damage.target, total = damage.total_damage))]
    pub async fn intercept(&self, damage: &mut DamageEvent) -> Result<Interception, WardError> {
        if let Some(reason) = precheck(damage) {
            debug!(?reason, "Damage not intercepted");
            return Ok(Interception::Skipped(reason));
        }

        let target = self.store.character(damage.target).await?;
        let Some(resource) = self.own_ward(&target) else {
            return Ok(Interception::Skipped(SkipReason::NotWarded));
        };
        if resource.is_depleted() {
            debug!("Ward depleted");
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
            ward_remaining = absorption.ward_remaining,
            "Ward absorbed damage"
        );

        if resource.verbose_messaging {
            self.narrate(&target, &absorption, damage.source).await?;
        }
        Ok(Interception::Absorbed(absorption))
    }

    /// The pool backing the target's own, non-delegated protective effect
    fn own_ward(&self, target: &Character) -> Option<WardResource> {
        if !is_ward_bearer(target, &self.rules) {
            return None;
        }
        let effect = protective_effect(target, &self.rules)?;
        if effect.is_delegated() {
            return None;
        }
        self.store.resource(target)
    }

    async fn narrate(
        &self,
        bearer: &Character,
        absorption: &Absorption,
        source: Option<CharacterId>,
    ) -> Result<(), WardError> {
        let report = self.composer.absorption(bearer.id, &bearer.name, absorption);
        self.chat.send(report, false).await?;

        if absorption.fully_blocked() {
            let attacker = match source {
                Some(id) => self.store.character(id).await.ok().map(|c| c.name),
                None => None,
            };
            let remark = self
                .composer
                .witty_remark(bearer.id, &bearer.name, attacker.as_deref())?;
            self.chat.send(remark.message, remark.use_bubble).await?;
        }
        Ok(())
    }
}

/// Checks that need nothing but the event itself
pub(crate) fn precheck(damage: &DamageEvent) -> Option<SkipReason> {
    if damage.is_healing_only() {
        Some(SkipReason::HealingOnly)
    } else if !damage.is_hit {
        Some(SkipReason::Missed)
    } else if damage.total_damage == 0 {
        Some(SkipReason::NoDamage)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{bearer, hit, set_verbose, warded, Harness};
    use crate::domain::entities::{ActorKind, DamageComponent, DamageType};

    async fn setup(character: &Character) -> (Harness, DamageInterceptionService) {
        let harness = Harness::new();
        harness.host.insert(character.clone()).await;
        let service = harness.interception();
        (harness, service)
    }

    #[tokio::test]
    async fn test_partial_absorption_rewrites_event_and_persists() {
        let mira = warded("Mira", 0, 10);
        let (harness, service) = setup(&mira).await;
        let mut damage = hit(mira.id, None, 15);

        let outcome = service.intercept(&mut damage).await.unwrap();

        let Interception::Absorbed(absorption) = outcome else {
            panic!("Expected absorption, got {:?}", outcome);
        };
        assert_eq!(absorption.absorbed, 10);
        assert_eq!(damage.total_damage, 5);
        assert_eq!(damage.components[0].value, 5);

        let stored = harness.store().get_resource(mira.id).await.unwrap().unwrap();
        assert_eq!(stored.current(), 0);

        let messages = harness.host.messages().await;
        assert_eq!(messages.len(), 1);
        assert!(messages[0].content.contains("collapses"));
        assert!(messages[0].content.contains("5 damage still gets through"));
    }

    #[tokio::test]
    async fn test_multi_component_overwrite_is_uniform() {
        let mira = warded("Mira", 0, 10);
        let (_harness, service) = setup(&mira).await;
        let mut damage = DamageEvent::hit(
            mira.id,
            None,
            vec![
                DamageComponent::new(DamageType::Fire, 9),
                DamageComponent::new(DamageType::Cold, 3),
            ],
        );

        service.intercept(&mut damage).await.unwrap();

        assert_eq!(damage.total_damage, 2);
        assert!(damage.components.iter().all(|c| c.value == 2));
    }

    #[tokio::test]
    async fn test_full_block_adds_witty_remark() {
        let mira = warded("Mira", 2, 10);
        let ogre = Character::new("Ogre", ActorKind::Npc);
        let (harness, service) = setup(&mira).await;
        harness.host.insert(ogre.clone()).await;
        let mut damage = hit(mira.id, Some(ogre.id), 5);

        service.intercept(&mut damage).await.unwrap();

        assert_eq!(damage.total_damage, 0);
        let messages = harness.host.messages().await;
        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("holds firm"));
        assert!(messages.iter().all(|m| m.speaker == mira.id));
        let stored = harness.store().get_resource(mira.id).await.unwrap().unwrap();
        assert_eq!(stored.current(), 3);
    }

    #[tokio::test]
    async fn test_quiet_bearer_absorbs_silently() {
        let mut mira = warded("Mira", 0, 10);
        set_verbose(&mut mira, false);
        let (harness, service) = setup(&mira).await;
        let mut damage = hit(mira.id, None, 4);

        service.intercept(&mut damage).await.unwrap();

        assert_eq!(damage.total_damage, 0);
        assert!(harness.host.messages().await.is_empty());
    }

    #[tokio::test]
    async fn test_preconditions_skip_without_mutation() {
        let mira = warded("Mira", 0, 10);
        let drained = warded("Drained", 10, 10);
        let unwarded = bearer("Unwarded", 0, 10);
        let harness = Harness::new();
        for c in [&mira, &drained, &unwarded] {
            harness.host.insert(c.clone()).await;
        }
        let service = harness.interception();

        let mut healing = DamageEvent::hit(
            mira.id,
            None,
            vec![DamageComponent::new(DamageType::Healing, 8)],
        );
        let mut missed = hit(mira.id, None, 8).missed();
        let mut zero = hit(mira.id, None, 0);
        let mut depleted = hit(drained.id, None, 8);
        let mut no_effect = hit(unwarded.id, None, 8);

        let cases = [
            (&mut healing, SkipReason::HealingOnly),
            (&mut missed, SkipReason::Missed),
            (&mut zero, SkipReason::NoDamage),
            (&mut depleted, SkipReason::Depleted),
            (&mut no_effect, SkipReason::NotWarded),
        ];
        for (damage, reason) in cases {
            let before = damage.clone();
            let outcome = service.intercept(damage).await.unwrap();
            assert_eq!(outcome, Interception::Skipped(reason));
            assert_eq!(*damage, before);
        }
        let stored = harness.store().get_resource(mira.id).await.unwrap().unwrap();
        assert_eq!(stored.current(), 10);
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_event_untouched() {
        let mira = warded("Mira", 0, 10);
        let (harness, service) = setup(&mira).await;
        harness.host.fail_writes(true);
        let mut damage = hit(mira.id, None, 6);

        assert!(service.intercept(&mut damage).await.is_err());
        assert_eq!(damage.total_damage, 6);
    }

    #[tokio::test]
    async fn test_delegated_copy_is_not_an_own_ward() {
        let mira = warded("Mira", 0, 10);
        let template = mira.effects[0].clone();
        let mut brak = bearer("Brak", 0, 10);
        brak.effects.push(template.delegated_copy(mira.id));
        let (_harness, service) = setup(&brak).await;
        let mut damage = hit(brak.id, None, 6);

        let outcome = service.intercept(&mut damage).await.unwrap();

        assert_eq!(outcome, Interception::Skipped(SkipReason::NotWarded));
    }
}
