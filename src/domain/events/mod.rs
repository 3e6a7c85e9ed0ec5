//! Host notifications - things that happened in the host's pipeline
//!
//! The host delivers these in order; the engine reacts through the
//! notification dispatcher and may rewrite payloads in place.

mod notifications;

pub use notifications::{
    ActionResolved, AttackResolved, AttackTarget, DamageAboutToApply, Notification,
    NotificationKind, RestCompleted, RestType, SheetControl, SheetRendered,
};
