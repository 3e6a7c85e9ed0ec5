//! Participant role in a shared session

use serde::{Deserialize, Serialize};

/// Exactly one connected participant at a time should be the game master
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    /// Privileged coordinator; may write any record
    GameMaster,
    Player,
}

impl ParticipantRole {
    pub fn is_privileged(self) -> bool {
        self == Self::GameMaster
    }
}
