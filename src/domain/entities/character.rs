//! Character entity - a host actor as seen by the ward engine

use serde::{Deserialize, Serialize};

use crate::domain::entities::{ActiveEffect, Item, ItemKind};
use crate::domain::value_objects::{CharacterId, EffectId, ItemId};

/// Host actor type. Only player characters are reconciled at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    Character,
    Npc,
}

/// A character owned by the host's registry
///
/// The engine never creates or destroys characters; it reads snapshots
/// through the host data port and writes back individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub kind: ActorKind,
    /// Class features, subclasses, spells and equipment
    pub items: Vec<Item>,
    /// Effects applied directly to the character
    pub effects: Vec<ActiveEffect>,
}

impl Character {
    pub fn new(name: impl Into<String>, kind: ActorKind) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            kind,
            items: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_effect(mut self, effect: ActiveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// First item of the given kind whose name contains `needle`
    pub fn find_item(&self, kind: ItemKind, needle: &str) -> Option<&Item> {
        self.items
            .iter()
            .find(|item| item.kind == kind && item.name.contains(needle))
    }

    /// First effect on the character with exactly this name
    pub fn effect_named(&self, name: &str) -> Option<&ActiveEffect> {
        self.effects.iter().find(|effect| effect.name == name)
    }

    pub fn remove_effect(&mut self, id: EffectId) -> Option<ActiveEffect> {
        let pos = self.effects.iter().position(|effect| effect.id == id)?;
        Some(self.effects.remove(pos))
    }
}
