//! Active effects - the protective marker enabling ward absorption

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CharacterId, EffectId, ItemId};

/// Host-driven expiry conditions carried on an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpecialDuration {
    LongRest,
}

/// An effect attached to a character or stored as a template on an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveEffect {
    pub id: EffectId,
    pub name: String,
    pub label: String,
    pub description: String,
    pub icon: String,
    /// Item the effect originates from
    pub origin: ItemId,
    pub disabled: bool,
    pub transfer: bool,
    pub special_durations: Vec<SpecialDuration>,
    /// Set on a projected copy: the bearer whose ward backs this instance
    pub delegated_by: Option<CharacterId>,
}

impl ActiveEffect {
    /// Template stored on the ward feature and copied onto the bearer
    pub fn ward_template(
        name: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        origin: ItemId,
    ) -> Self {
        Self {
            id: EffectId::new(),
            name: name.into(),
            label: label.into(),
            description: description.into(),
            icon: icon.into(),
            origin,
            disabled: false,
            transfer: false,
            special_durations: vec![SpecialDuration::LongRest],
            delegated_by: None,
        }
    }

    /// A distinct instance of this effect for placing on a character
    pub fn instantiate(&self) -> Self {
        Self {
            id: EffectId::new(),
            ..self.clone()
        }
    }

    /// A distinct instance backed by another bearer's ward
    pub fn delegated_copy(&self, bearer: CharacterId) -> Self {
        Self {
            delegated_by: Some(bearer),
            ..self.instantiate()
        }
    }

    pub fn is_delegated(&self) -> bool {
        self.delegated_by.is_some()
    }
}
