//! Application layer - Ward engine services and the ports they depend on
//!
//! Services depend only on the port traits in `ports`; the host, the
//! transport and the UI are supplied from outside at construction time.

pub mod dto;
pub mod errors;
pub mod ports;
pub mod services;
