//! Participant port - Who is connected and who controls which character

use crate::domain::value_objects::{CharacterId, ParticipantId};

/// Port describing the participants of the running session
///
/// Exactly one participant at a time may be the privileged coordinator.
pub trait ParticipantPort: Send + Sync {
    /// The participant this process acts for
    fn local_participant(&self) -> ParticipantId;

    /// True when the local participant is the privileged coordinator
    fn is_coordinator(&self) -> bool;

    /// True when some coordinator is currently connected
    fn coordinator_connected(&self) -> bool;

    /// The connected, non-privileged participant controlling a character
    ///
    /// `None` when only the coordinator controls it or its owner is offline.
    fn controlling_participant(&self, character: CharacterId) -> Option<ParticipantId>;

    /// True when this process may write the character's records
    fn has_mutation_rights(&self, character: CharacterId) -> bool;
}
