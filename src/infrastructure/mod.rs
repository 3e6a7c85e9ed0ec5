//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Config: Application configuration
//! - Localization: JSON phrase catalog
//! - In-memory host, session roster and broadcast hub for headless sessions
//! - Workers: Socket listener and expiry sweeper
//! - Runtime: Engine bootstrap, optionally seated in a relay room
//! - Relay: WebSocket server carrying envelopes between participants

pub mod broadcast;
pub mod config;
pub mod http;
pub mod localization;
pub mod memory_host;
pub mod participants;
pub mod random_adapter;
pub mod relay;
pub mod relay_bridge;
pub mod runtime;
pub mod state;
pub mod websocket;
pub mod workers;
