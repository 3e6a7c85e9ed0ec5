//! Value objects - Immutable objects defined by their attributes

mod dialog;
mod ids;
mod participant;
mod ward_rules;

pub use dialog::{DialogAnswer, DialogKind};
pub use ids::*;
pub use participant::ParticipantRole;
pub use ward_rules::WardRules;
