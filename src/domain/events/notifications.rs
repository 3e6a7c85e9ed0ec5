use serde::{Deserialize, Serialize};

use crate::domain::entities::{DamageEvent, Item};
use crate::domain::value_objects::{CharacterId, ItemId};

/// Discriminant used to subscribe to one kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    ActionResolved,
    AttackResolved,
    DamageAboutToApply,
    RestCompleted,
    SheetRendered,
}

/// All host notifications the engine consumes
#[derive(Debug, Clone)]
pub enum Notification {
    ActionResolved(ActionResolved),
    AttackResolved(AttackResolved),
    DamageAboutToApply(DamageAboutToApply),
    RestCompleted(RestCompleted),
    SheetRendered(SheetRendered),
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::ActionResolved(_) => NotificationKind::ActionResolved,
            Self::AttackResolved(_) => NotificationKind::AttackResolved,
            Self::DamageAboutToApply(_) => NotificationKind::DamageAboutToApply,
            Self::RestCompleted(_) => NotificationKind::RestCompleted,
            Self::SheetRendered(_) => NotificationKind::SheetRendered,
        }
    }

    /// The character the notification is about
    pub fn subject(&self) -> CharacterId {
        match self {
            Self::ActionResolved(n) => n.actor,
            Self::AttackResolved(n) => n.attacker,
            Self::DamageAboutToApply(n) => n.damage.target,
            Self::RestCompleted(n) => n.actor,
            Self::SheetRendered(n) => n.character,
        }
    }
}

/// A character finished using an item (spell, feature, weapon)
#[derive(Debug, Clone)]
pub struct ActionResolved {
    pub actor: CharacterId,
    pub item: Item,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackTarget {
    pub target: CharacterId,
    pub hit: bool,
}

/// An attack roll was resolved against one or more targets
#[derive(Debug, Clone)]
pub struct AttackResolved {
    pub attacker: CharacterId,
    /// Name of the item used, shown in confirmation prompts
    pub item_name: String,
    pub targets: Vec<AttackTarget>,
}

/// Damage is about to be applied; handlers may rewrite `damage`
#[derive(Debug, Clone)]
pub struct DamageAboutToApply {
    pub damage: DamageEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestType {
    Short,
    Long,
}

#[derive(Debug, Clone)]
pub struct RestCompleted {
    pub actor: CharacterId,
    pub rest: RestType,
}

/// A control the host should render on an item sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetControl {
    pub item: ItemId,
    /// Localized title of the toggle
    pub title: String,
    /// Localized state label
    pub label: String,
    pub enabled: bool,
}

/// An item sheet is being rendered; handlers may append controls
#[derive(Debug, Clone)]
pub struct SheetRendered {
    pub character: CharacterId,
    pub item: Item,
    pub controls: Vec<SheetControl>,
}
