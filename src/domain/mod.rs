//! Domain layer - Core ward rules with no knowledge of the host or transport
//!
//! This layer contains:
//! - Entities: Character, Item, ActiveEffect, DamageEvent, WardResource
//! - Value Objects: typed ids and the configurable ward rules
//! - Events: notifications delivered by the host
//! - Domain Services: pure eligibility predicates

pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;
