//! Ward resource - the absorption pool attached to a ward-bearer
//!
//! The host stores the pool as "spent out of max". Every value produced
//! here is clamped so that `0 <= current <= max` holds.

use serde::{Deserialize, Serialize};

use crate::domain::entities::Item;
use crate::domain::value_objects::{CharacterId, ItemId};

/// Snapshot of a bearer's ward pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardResource {
    pub bearer: CharacterId,
    /// Feature item the pool is persisted on
    pub feature: ItemId,
    current: u32,
    max: u32,
    pub verbose_messaging: bool,
}

/// Result of running damage through a ward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Absorption {
    pub absorbed: u32,
    /// Damage left for the character after the ward
    pub remaining: u32,
    /// Ward capacity after absorbing
    pub ward_remaining: u32,
}

impl Absorption {
    pub fn fully_blocked(&self) -> bool {
        self.remaining == 0
    }

    pub fn depleted(&self) -> bool {
        self.ward_remaining == 0
    }
}

/// Result of charging a ward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replenishment {
    /// Nothing was spent; the pool is unchanged
    AlreadyFull,
    Restored {
        /// Amount the action asked to restore
        requested: u32,
        /// Amount actually restored after clamping at max
        restored: u32,
        /// Spent amount to persist
        spent: u32,
    },
}

impl WardResource {
    pub fn new(bearer: CharacterId, feature: ItemId, current: u32, max: u32) -> Self {
        Self {
            bearer,
            feature,
            current: current.min(max),
            max,
            verbose_messaging: false,
        }
    }

    /// Read the pool off a ward feature; None when the feature tracks no uses
    pub fn from_feature(bearer: CharacterId, feature: &Item) -> Option<Self> {
        let uses = feature.uses?;
        let mut resource = Self::new(bearer, feature.id, uses.value(), uses.max);
        resource.verbose_messaging = feature.flags.verbose_messaging;
        Some(resource)
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn spent(&self) -> u32 {
        self.max - self.current
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Clamp a spent amount into `[0, max]`
    pub fn clamp_spent(&self, spent: u32) -> u32 {
        spent.min(self.max)
    }

    /// Split `total_damage` between the ward and the character
    pub fn absorb(&self, total_damage: u32) -> Absorption {
        let absorbed = self.current.min(total_damage);
        Absorption {
            absorbed,
            remaining: total_damage - absorbed,
            ward_remaining: self.current - absorbed,
        }
    }

    /// Reduce the spent amount by `heal`, never below zero
    pub fn replenish(&self, heal: u32) -> Replenishment {
        let spent = self.spent();
        if spent == 0 {
            return Replenishment::AlreadyFull;
        }
        let new_spent = spent.saturating_sub(heal);
        Replenishment::Restored {
            requested: heal,
            restored: spent - new_spent,
            spent: new_spent,
        }
    }
}
