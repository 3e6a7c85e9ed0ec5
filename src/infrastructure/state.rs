//! Shared relay server state

use tokio::sync::RwLock;

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::relay::RoomRegistry;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    /// Connected sockets, grouped by room
    pub rooms: RwLock<RoomRegistry>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            rooms: RwLock::new(RoomRegistry::new()),
        }
    }
}
