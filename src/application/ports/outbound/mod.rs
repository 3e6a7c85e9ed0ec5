//! Outbound ports - Interfaces the engine requires from the host and transport

mod broadcast_port;
mod chat_port;
mod dialog_port;
mod geometry_port;
mod host_data_port;
mod localization_port;
mod participant_port;
mod random_port;

pub use broadcast_port::{BroadcastError, BroadcastPort};
pub use chat_port::{ChatMessage, ChatPort, RollMode};
pub use dialog_port::{DialogPort, DialogPrompt};
pub use geometry_port::GeometryPort;
pub use host_data_port::{HostDataPort, HostError};
pub use localization_port::{fill_placeholders, LocalizationPort};
pub use participant_port::ParticipantPort;
pub use random_port::RandomPort;

#[cfg(test)]
pub use geometry_port::MockGeometryPort;
#[cfg(test)]
pub use random_port::MockRandomPort;
