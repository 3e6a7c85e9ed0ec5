//! Session roster - Connected participants and character ownership
//!
//! One roster is shared by every participant of a session; each process
//! gets a `RosterView` bound to its own participant id.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::application::ports::outbound::ParticipantPort;
use crate::domain::value_objects::{CharacterId, ParticipantId, ParticipantRole};

#[derive(Debug, Clone, Copy)]
struct Member {
    role: ParticipantRole,
    connected: bool,
}

#[derive(Default)]
struct RosterState {
    members: HashMap<ParticipantId, Member>,
    /// Owners per character, in the order ownership was granted
    owners: HashMap<CharacterId, Vec<ParticipantId>>,
}

#[derive(Clone, Default)]
pub struct SessionRoster {
    state: Arc<RwLock<RosterState>>,
}

impl SessionRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, participant: ParticipantId, role: ParticipantRole) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.members.insert(
            participant,
            Member {
                role,
                connected: true,
            },
        );
        info!(%participant, ?role, "Participant joined");
    }

    /// Keep the membership but mark the participant offline
    pub fn disconnect(&self, participant: ParticipantId) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if let Some(member) = state.members.get_mut(&participant) {
            member.connected = false;
            info!(%participant, "Participant disconnected");
        }
    }

    pub fn grant_ownership(&self, character: CharacterId, participant: ParticipantId) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let owners = state.owners.entry(character).or_default();
        if !owners.contains(&participant) {
            owners.push(participant);
        }
    }

    pub fn view(&self, local: ParticipantId) -> RosterView {
        RosterView {
            roster: self.clone(),
            local,
        }
    }

    fn read<T>(&self, f: impl FnOnce(&RosterState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }
}

/// The roster as seen from one participant
#[derive(Clone)]
pub struct RosterView {
    roster: SessionRoster,
    local: ParticipantId,
}

impl ParticipantPort for RosterView {
    fn local_participant(&self) -> ParticipantId {
        self.local
    }

    fn is_coordinator(&self) -> bool {
        self.roster.read(|state| {
            state
                .members
                .get(&self.local)
                .is_some_and(|m| m.connected && m.role.is_privileged())
        })
    }

    fn coordinator_connected(&self) -> bool {
        self.roster.read(|state| {
            state
                .members
                .values()
                .any(|m| m.connected && m.role.is_privileged())
        })
    }

    fn controlling_participant(&self, character: CharacterId) -> Option<ParticipantId> {
        self.roster.read(|state| {
            state.owners.get(&character)?.iter().copied().find(|owner| {
                state
                    .members
                    .get(owner)
                    .is_some_and(|m| m.connected && !m.role.is_privileged())
            })
        })
    }

    fn has_mutation_rights(&self, character: CharacterId) -> bool {
        self.is_coordinator()
            || self.roster.read(|state| {
                state
                    .owners
                    .get(&character)
                    .is_some_and(|owners| owners.contains(&self.local))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinator_presence() {
        let roster = SessionRoster::new();
        let gm = ParticipantId::new();
        let player = ParticipantId::new();
        roster.join(gm, ParticipantRole::GameMaster);
        roster.join(player, ParticipantRole::Player);

        assert!(roster.view(gm).is_coordinator());
        assert!(!roster.view(player).is_coordinator());
        assert!(roster.view(player).coordinator_connected());

        roster.disconnect(gm);
        assert!(!roster.view(player).coordinator_connected());
    }

    #[test]
    fn test_controlling_participant_skips_offline_and_privileged_owners() {
        let roster = SessionRoster::new();
        let gm = ParticipantId::new();
        let away = ParticipantId::new();
        let present = ParticipantId::new();
        roster.join(gm, ParticipantRole::GameMaster);
        roster.join(away, ParticipantRole::Player);
        roster.join(present, ParticipantRole::Player);
        roster.disconnect(away);

        let mira = CharacterId::new();
        roster.grant_ownership(mira, gm);
        roster.grant_ownership(mira, away);
        roster.grant_ownership(mira, present);

        assert_eq!(roster.view(gm).controlling_participant(mira), Some(present));
        assert_eq!(roster.view(gm).controlling_participant(CharacterId::new()), None);
    }

    #[test]
    fn test_mutation_rights() {
        let roster = SessionRoster::new();
        let gm = ParticipantId::new();
        let player = ParticipantId::new();
        roster.join(gm, ParticipantRole::GameMaster);
        roster.join(player, ParticipantRole::Player);
        let mira = CharacterId::new();
        roster.grant_ownership(mira, player);

        assert!(roster.view(gm).has_mutation_rights(mira));
        assert!(roster.view(player).has_mutation_rights(mira));
        assert!(!roster.view(player).has_mutation_rights(CharacterId::new()));
    }
}
