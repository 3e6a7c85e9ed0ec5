//! Application services - Ward engine use cases
//!
//! Each service receives its dependencies explicitly at construction.
//! `ArcaneWardService` assembles the others and is the only handler the
//! host needs to register.

pub mod arcane_ward_service;
pub mod chat_relay_service;
pub mod confirmation_service;
pub mod damage_interception_service;
pub mod narrative_composer;
pub mod notification_dispatcher;
pub mod projected_ward_service;
pub mod replenishment_service;
pub mod ward_store;

#[cfg(test)]
pub(crate) mod test_support;

pub use arcane_ward_service::{ActionOutcome, ArcaneWardService, EngineSettings};
pub use chat_relay_service::ChatRelayService;
pub use confirmation_service::{Confirmation, ConfirmationService, Route};
pub use damage_interception_service::{DamageInterceptionService, Interception, SkipReason};
pub use narrative_composer::{NarrativeComposer, Perspective, WittyRemark};
pub use notification_dispatcher::{NotificationDispatcher, NotificationHandler};
pub use projected_ward_service::{ProjectedGrant, ProjectedWardService};
pub use replenishment_service::{ReplenishOutcome, ReplenishmentService};
pub use ward_store::WardStore;
