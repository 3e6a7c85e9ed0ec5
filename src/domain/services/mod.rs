//! Domain services - Pure business logic over domain entities

pub mod eligibility;

pub use eligibility::{
    has_projected_ward, has_protective_effect, has_ward_resource, is_charging_action,
    is_ward_bearer, protective_effect, ward_feature,
};
