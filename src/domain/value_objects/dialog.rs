//! Confirmation dialog variants and answers

use serde::{Deserialize, Serialize};

/// Which question a confirmation dialog asks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DialogKind {
    /// Create the ward after casting a charging spell
    CreateWard,
    /// Project the ward onto an attacked ally
    ProjectedWard,
}

/// Terminal state of a confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogAnswer {
    Yes,
    No,
}

impl DialogAnswer {
    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }
}

impl Default for DialogAnswer {
    /// Dismissed dialogs resolve to no
    fn default() -> Self {
        Self::No
    }
}
