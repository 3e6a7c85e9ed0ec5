//! Item entity - features, subclasses and spells carried by a character

use serde::{Deserialize, Serialize};

use crate::domain::entities::ActiveEffect;
use crate::domain::value_objects::{ActivityId, EffectId, ItemId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Subclass,
    Feat,
    Spell,
    Weapon,
    Other,
}

/// Limited-use counter tracked by the host as "spent out of max"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUses {
    pub spent: u32,
    pub max: u32,
}

impl ItemUses {
    pub fn new(spent: u32, max: u32) -> Self {
        Self { spent, max }
    }

    /// Uses still available
    pub fn value(&self) -> u32 {
        self.max.saturating_sub(self.spent)
    }
}

/// An activation definition on an item and the effects it applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub effects: Vec<EffectId>,
}

impl Activity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActivityId::new(),
            name: name.into(),
            effects: Vec::new(),
        }
    }

    /// Link an effect, returning false when it was already linked
    pub fn link_effect(&mut self, effect: EffectId) -> bool {
        if self.effects.contains(&effect) {
            return false;
        }
        self.effects.push(effect);
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellDetails {
    /// 0 for cantrips
    pub level: u8,
    /// School tag as reported by the host, e.g. "abj" or "Abjuration"
    pub school: String,
}

/// Module-owned flags persisted on the ward feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardFlags {
    #[serde(default)]
    pub verbose_messaging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    pub description: String,
    pub uses: Option<ItemUses>,
    pub activities: Vec<Activity>,
    /// Template effects stored on the item itself
    pub effects: Vec<ActiveEffect>,
    pub spell: Option<SpellDetails>,
    pub flags: WardFlags,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            kind,
            description: String::new(),
            uses: None,
            activities: Vec::new(),
            effects: Vec::new(),
            spell: None,
            flags: WardFlags::default(),
        }
    }

    /// Convenience constructor for a spell item
    pub fn spell(name: impl Into<String>, level: u8, school: impl Into<String>) -> Self {
        let mut item = Self::new(name, ItemKind::Spell);
        item.spell = Some(SpellDetails {
            level,
            school: school.into(),
        });
        item
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_uses(mut self, spent: u32, max: u32) -> Self {
        self.uses = Some(ItemUses::new(spent, max));
        self
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    pub fn with_effect(mut self, effect: ActiveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_verbose_messaging(mut self, enabled: bool) -> Self {
        self.flags.verbose_messaging = enabled;
        self
    }

    pub fn activity_named(&self, name: &str) -> Option<&Activity> {
        self.activities.iter().find(|activity| activity.name == name)
    }

    pub fn effect_named(&self, name: &str) -> Option<&ActiveEffect> {
        self.effects.iter().find(|effect| effect.name == name)
    }
}
