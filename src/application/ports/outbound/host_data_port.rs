//! Host data port - Reads and writes the host's character records
//!
//! The host owns every character, item and effect. The engine reads
//! snapshots and writes back single fields; it never creates or deletes
//! characters.

use async_trait::async_trait;

use crate::domain::entities::{ActiveEffect, Activity, Character, WardFlags};
use crate::domain::value_objects::{CharacterId, EffectId, ItemId};

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("Effect not found: {0}")]
    EffectNotFound(EffectId),
    #[error("Storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait HostDataPort: Send + Sync {
    async fn get_character(&self, id: CharacterId) -> Result<Option<Character>, HostError>;

    /// All characters in the session, in the host's enumeration order
    async fn list_characters(&self) -> Result<Vec<Character>, HostError>;

    /// Persist the spent counter of an item's uses
    async fn set_item_uses_spent(
        &self,
        character: CharacterId,
        item: ItemId,
        spent: u32,
    ) -> Result<(), HostError>;

    /// Store a template effect on an item
    async fn create_item_effect(
        &self,
        character: CharacterId,
        item: ItemId,
        effect: ActiveEffect,
    ) -> Result<(), HostError>;

    /// Replace an item's activation definitions
    async fn set_item_activities(
        &self,
        character: CharacterId,
        item: ItemId,
        activities: Vec<Activity>,
    ) -> Result<(), HostError>;

    async fn set_item_flags(
        &self,
        character: CharacterId,
        item: ItemId,
        flags: WardFlags,
    ) -> Result<(), HostError>;

    /// Apply an effect directly to a character
    async fn create_character_effect(
        &self,
        character: CharacterId,
        effect: ActiveEffect,
    ) -> Result<(), HostError>;

    async fn delete_character_effect(
        &self,
        character: CharacterId,
        effect: EffectId,
    ) -> Result<(), HostError>;
}
