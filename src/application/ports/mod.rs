//! Ports - Interfaces between the ward engine and the outside world

pub mod outbound;

use std::sync::Arc;

use outbound::{
    BroadcastPort, ChatPort, DialogPort, GeometryPort, HostDataPort, LocalizationPort,
    ParticipantPort, RandomPort,
};

/// Every outbound dependency of the engine, built once at process start
#[derive(Clone)]
pub struct WardPorts {
    pub host: Arc<dyn HostDataPort>,
    pub geometry: Arc<dyn GeometryPort>,
    pub participants: Arc<dyn ParticipantPort>,
    pub broadcast: Arc<dyn BroadcastPort>,
    pub dialogs: Arc<dyn DialogPort>,
    pub chat: Arc<dyn ChatPort>,
    pub localization: Arc<dyn LocalizationPort>,
    pub random: Arc<dyn RandomPort>,
}
