//! JSON phrase catalog
//!
//! Templates are looked up by dotted path into a nested JSON document.
//! A catalog is validated on load: missing templates or empty phrase lists
//! are packaging defects and fail startup.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::application::ports::outbound::{fill_placeholders, LocalizationPort};
use crate::application::services::narrative_composer::keys;

/// The English catalog shipped with the crate
const BUNDLED_EN: &str = include_str!("../../lang/en.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read phrase catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid phrase catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Missing phrase template '{0}'")]
    MissingTemplate(String),
    #[error("Phrase list '{0}' is missing or empty")]
    EmptyPhraseList(String),
}

#[derive(Debug, Clone)]
pub struct PhraseCatalog {
    root: Value,
}

impl PhraseCatalog {
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let catalog = Self {
            root: serde_json::from_str(text)?,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let catalog = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), "Loaded phrase catalog");
        Ok(catalog)
    }

    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_EN)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for key in keys::REQUIRED {
            if !self.lookup(key).is_some_and(Value::is_string) {
                return Err(CatalogError::MissingTemplate(key.to_string()));
            }
        }
        for key in keys::PHRASE_LISTS {
            if self.phrase_list(key).is_empty() {
                return Err(CatalogError::EmptyPhraseList(key.to_string()));
            }
        }
        Ok(())
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        key.split('.').try_fold(&self.root, |node, part| node.get(part))
    }
}

impl LocalizationPort for PhraseCatalog {
    fn format(&self, key: &str, params: &[(&str, &str)]) -> String {
        match self.lookup(key).and_then(Value::as_str) {
            Some(template) => fill_placeholders(template, params),
            None => key.to_string(),
        }
    }

    fn phrase_list(&self, key: &str) -> Vec<String> {
        let values: Vec<&Value> = match self.lookup(key) {
            Some(Value::Object(map)) => map.values().collect(),
            Some(Value::Array(items)) => items.iter().collect(),
            _ => return Vec::new(),
        };
        values
            .into_iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    }
}
