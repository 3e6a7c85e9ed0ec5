//! Arcane Warding - Ward resource automation for tabletop sessions
//!
//! The engine reacts to host notifications (resolved actions and attacks,
//! incoming damage, rests, sheet rendering) and keeps an Abjurer's Arcane
//! Ward in step with them:
//! - absorbing damage before it reaches hit points
//! - replenishing the ward when abjuration spells are cast
//! - projecting the ward onto allies in range, after confirmation
//!
//! Hosts supply the outbound ports in `application::ports`; the in-memory
//! adapters in `infrastructure` run a whole session in one process.

pub mod application;
pub mod domain;
pub mod infrastructure;
