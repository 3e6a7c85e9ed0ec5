//! Damage events produced by the host's combat pipeline

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::CharacterId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    Acid,
    Bludgeoning,
    Cold,
    Fire,
    Force,
    Lightning,
    Necrotic,
    Piercing,
    Poison,
    Psychic,
    Radiant,
    Slashing,
    Thunder,
    Healing,
}

/// One typed line of a damage breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageComponent {
    pub damage_type: DamageType,
    pub value: u32,
}

impl DamageComponent {
    pub fn new(damage_type: DamageType, value: u32) -> Self {
        Self { damage_type, value }
    }
}

/// Damage about to be applied to a target
///
/// The engine may rewrite the amounts in place before the host applies
/// them; callers must re-read the event after dispatching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageEvent {
    pub total_damage: u32,
    /// Portion routed to hit points
    pub hp_damage: u32,
    pub components: Vec<DamageComponent>,
    pub is_hit: bool,
    pub source: Option<CharacterId>,
    pub target: CharacterId,
}

impl DamageEvent {
    /// A hit whose total is the sum of its components
    pub fn hit(
        target: CharacterId,
        source: Option<CharacterId>,
        components: Vec<DamageComponent>,
    ) -> Self {
        let total: u32 = components.iter().map(|c| c.value).sum();
        Self {
            total_damage: total,
            hp_damage: total,
            components,
            is_hit: true,
            source,
            target,
        }
    }

    pub fn missed(mut self) -> Self {
        self.is_hit = false;
        self
    }

    /// True when every component is healing
    pub fn is_healing_only(&self) -> bool {
        !self.components.is_empty()
            && self
                .components
                .iter()
                .all(|c| c.damage_type == DamageType::Healing)
    }

    /// Overwrite the total and every component with `remaining`
    ///
    /// Components are not split proportionally: each one receives the
    /// full remaining amount.
    pub fn overwrite_remaining(&mut self, remaining: u32) {
        self.total_damage = remaining;
        self.hp_damage = remaining;
        for component in &mut self.components {
            component.value = remaining;
        }
    }
}
