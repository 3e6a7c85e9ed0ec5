//! Data Transfer Objects - For the broadcast channel boundary
//!
//! Both ends of the socket must agree on these shapes out of band; there is
//! no schema versioning.

pub mod socket;

pub use socket::*;
