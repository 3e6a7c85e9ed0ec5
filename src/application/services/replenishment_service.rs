//! Replenishment Service - Charges a bearer's ward from charging spells

use tracing::{debug, info, instrument};

use crate::application::errors::WardError;
use crate::application::services::chat_relay_service::ChatRelayService;
use crate::application::services::narrative_composer::{keys, NarrativeComposer};
use crate::application::services::ward_store::WardStore;
use crate::domain::entities::{Character, Item, Replenishment};

/// Pool restored per spell level
pub const HEAL_PER_LEVEL: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplenishOutcome {
    /// Cantrips never charge the ward
    Cantrip,
    NoResource,
    /// Nothing was spent
    AlreadyFull,
    Restored { restored: u32, current: u32 },
}

#[derive(Clone)]
pub struct ReplenishmentService {
    store: WardStore,
    composer: NarrativeComposer,
    chat: ChatRelayService,
}

impl ReplenishmentService {
    pub fn new(store: WardStore, composer: NarrativeComposer, chat: ChatRelayService) -> Self {
        Self {
            store,
            composer,
            chat,
        }
    }

    /// Charge `bearer`'s ward from a resolved charging spell
    #[instrument(skip(self, bearer, spell), fields(bearer = %bearer.name, spell = %spell.name))]
    pub async fn replenish(
        &self,
        bearer: &Character,
        spell: &Item,
    ) -> Result<ReplenishOutcome, WardError> {
        let level = spell.spell.as_ref().map_or(0, |details| details.level);
        if level == 0 {
            debug!("Cantrip does not charge the ward");
            return Ok(ReplenishOutcome::Cantrip);
        }
        let Some(resource) = self.store.resource(bearer) else {
            return Ok(ReplenishOutcome::NoResource);
        };
        let actor = [("actor", bearer.name.as_str())];

        match resource.replenish(u32::from(level) * HEAL_PER_LEVEL) {
            Replenishment::AlreadyFull => {
                debug!("Ward already at full strength");
                if resource.verbose_messaging {
                    let notice = self.composer.announcement(bearer.id, keys::WARD_AT_MAX, &actor);
                    self.chat.send(notice, false).await?;
                }
                Ok(ReplenishOutcome::AlreadyFull)
            }
            Replenishment::Restored {
                requested,
                restored,
                spent,
            } => {
                let spent = self.store.set_spent(&resource, spent).await?;
                let current = resource.max() - spent;
                info!(requested, restored, current, "Ward replenished");
                if resource.verbose_messaging {
                    let notice = self.composer.announcement(bearer.id, keys::WARD_HEALED, &actor);
                    self.chat.send(notice, false).await?;
                }
                Ok(ReplenishOutcome::Restored { restored, current })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{warded, Harness};

    async fn run(spent: u32, spell: Item) -> (Harness, ReplenishOutcome) {
        let harness = Harness::new();
        let mira = warded("Mira", spent, 10);
        harness.host.insert(mira.clone()).await;
        let outcome = harness.replenishment().replenish(&mira, &spell).await.unwrap();
        (harness, outcome)
    }

    #[tokio::test]
    async fn test_level_two_restores_four() {
        let (harness, outcome) = run(7, Item::spell("Arcane Lock", 2, "abj")).await;

        assert_eq!(
            outcome,
            ReplenishOutcome::Restored {
                restored: 4,
                current: 7
            }
        );
        let messages = harness.host.messages().await;
        assert_eq!(messages.len(), 1);
        assert!(messages[0].content.contains("flows back"));
    }

    #[tokio::test]
    async fn test_restore_is_clamped_at_max() {
        let (_harness, outcome) = run(3, Item::spell("Banishment", 4, "abj")).await;

        assert_eq!(
            outcome,
            ReplenishOutcome::Restored {
                restored: 3,
                current: 10
            }
        );
    }

    #[tokio::test]
    async fn test_full_ward_reports_at_max() {
        let (harness, outcome) = run(0, Item::spell("Shield", 1, "abj")).await;

        assert_eq!(outcome, ReplenishOutcome::AlreadyFull);
        let messages = harness.host.messages().await;
        assert!(messages[0].content.contains("already at full strength"));
    }

    #[tokio::test]
    async fn test_cantrip_is_a_noop() {
        let (harness, outcome) = run(5, Item::spell("Resistance", 0, "abj")).await;

        assert_eq!(outcome, ReplenishOutcome::Cantrip);
        assert!(harness.host.messages().await.is_empty());
    }
}
