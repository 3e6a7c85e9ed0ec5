//! Relay rooms - Which sockets belong to which session
//!
//! The relay carries socket envelopes between the processes of one session
//! (a room). It never interprets them beyond checking that they parse.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::application::dto::SocketMessage;
use crate::domain::value_objects::{ParticipantId, ParticipantRole};

/// Frames the relay itself sends to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RelayNotice {
    RelayError { code: String, message: String },
}

impl RelayNotice {
    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::RelayError {
            code: "PARSE_ERROR".to_string(),
            message: format!("Invalid socket envelope: {}", detail),
        }
    }
}

/// Check that a text frame is a socket envelope worth forwarding
pub fn validate_frame(text: &str) -> Result<SocketMessage, RelayNotice> {
    serde_json::from_str(text).map_err(RelayNotice::parse_error)
}

#[derive(Debug)]
struct RoomMember {
    participant: ParticipantId,
    role: ParticipantRole,
    joined_at: DateTime<Utc>,
    sender: mpsc::UnboundedSender<String>,
}

/// A participant that left, with how long it stayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    pub role: ParticipantRole,
    pub connected_for: chrono::Duration,
    pub remaining: usize,
}

/// Registry of relay rooms and their connected members
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Vec<RoomMember>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member to a room, replacing an older socket of the same participant
    ///
    /// Returns the number of members now in the room.
    pub fn join(
        &mut self,
        room: &str,
        participant: ParticipantId,
        role: ParticipantRole,
        sender: mpsc::UnboundedSender<String>,
    ) -> usize {
        let members = self.rooms.entry(room.to_string()).or_default();
        members.retain(|m| m.participant != participant);
        members.push(RoomMember {
            participant,
            role,
            joined_at: Utc::now(),
            sender,
        });
        members.len()
    }

    /// Remove the member registered with `sender`; empty rooms are dropped
    ///
    /// A socket that was replaced by a rejoin leaves nothing behind.
    pub fn leave(
        &mut self,
        room: &str,
        participant: ParticipantId,
        sender: &mpsc::UnboundedSender<String>,
    ) -> Option<Departure> {
        let members = self.rooms.get_mut(room)?;
        let index = members
            .iter()
            .position(|m| m.participant == participant && m.sender.same_channel(sender))?;
        let member = members.remove(index);
        let remaining = members.len();
        if remaining == 0 {
            self.rooms.remove(room);
        }
        Some(Departure {
            role: member.role,
            connected_for: Utc::now() - member.joined_at,
            remaining,
        })
    }

    /// Send a frame to every other member of the room
    ///
    /// Returns how many members it was handed to.
    pub fn forward(&self, room: &str, from: ParticipantId, text: &str) -> usize {
        let Some(members) = self.rooms.get(room) else {
            return 0;
        };
        members
            .iter()
            .filter(|m| m.participant != from)
            .filter(|m| m.sender.send(text.to_string()).is_ok())
            .count()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// True when a game master is connected to the room
    pub fn has_coordinator(&self, room: &str) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|members| members.iter().any(|m| m.role.is_privileged()))
    }
}
