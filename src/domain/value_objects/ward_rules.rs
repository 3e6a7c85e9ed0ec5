//! Ward rules value object
//!
//! Names and thresholds the engine matches host data against. Matching is by
//! display name because the host exposes no stable identifiers for class
//! features.

use serde::{Deserialize, Serialize};

/// Configurable rules for recognising ward-bearers and charging actions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WardRules {
    /// Subclass name a ward-bearer must carry (substring match)
    pub eligible_subclass: String,
    /// Feature item holding the ward resource (substring match)
    pub ward_feature: String,
    /// Display name of the protective effect (exact match)
    pub effect_name: String,
    /// Feature granting delegated protection (substring match)
    pub projected_ward_feature: String,
    /// Activity on the ward feature that applies the protective effect
    pub create_activity: String,
    /// Spell schools that charge the ward (case-insensitive substring match)
    pub charging_schools: Vec<String>,
    /// Maximum distance between a delegating bearer and the protected target
    pub projection_range: f64,
    /// Icon used for a freshly created protective effect
    pub effect_icon: String,
}

impl Default for WardRules {
    fn default() -> Self {
        Self {
            eligible_subclass: "Abjurer".to_string(),
            ward_feature: "Arcane Ward".to_string(),
            effect_name: "Arcane Ward".to_string(),
            projected_ward_feature: "Projected Ward".to_string(),
            create_activity: "Create Ward".to_string(),
            charging_schools: vec!["abjuration".to_string(), "abj".to_string()],
            projection_range: 30.0,
            effect_icon: "icons/magic/defensive/shield-barrier-flaming-pentagon-blue-yellow.webp"
                .to_string(),
        }
    }
}
