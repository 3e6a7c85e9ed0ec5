//! Errors raised by ward services
//!
//! None of these reach the host pipeline: the notification dispatcher logs
//! them and lets damage and action resolution continue with defaults.

use crate::application::ports::outbound::{BroadcastError, HostError};
use crate::domain::value_objects::{CharacterId, ItemId};

#[derive(Debug, thiserror::Error)]
pub enum WardError {
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Broadcast error: {0}")]
    Broadcast(#[from] BroadcastError),

    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("Item {item} not found on character {character}")]
    ItemNotFound { character: CharacterId, item: ItemId },

    #[error("Activity '{activity}' missing on item {item}")]
    MissingActivity { item: ItemId, activity: String },

    #[error("No template effect '{effect}' on item {item}")]
    MissingTemplate { item: ItemId, effect: String },

    #[error("No phrases configured for '{0}'")]
    MissingPhrases(String),
}
