//! Ward Store - Reads and persists ward resources on host records
//!
//! All writes to the pool go through `set_spent`, which clamps the value
//! before it reaches the host.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::application::errors::WardError;
use crate::application::ports::outbound::HostDataPort;
use crate::application::services::narrative_composer::{keys, NarrativeComposer};
use crate::domain::entities::{ActiveEffect, Character, WardResource};
use crate::domain::services::{protective_effect, ward_feature};
use crate::domain::value_objects::{CharacterId, WardRules};

#[derive(Clone)]
pub struct WardStore {
    host: Arc<dyn HostDataPort>,
    composer: NarrativeComposer,
    rules: Arc<WardRules>,
}

impl WardStore {
    pub fn new(
        host: Arc<dyn HostDataPort>,
        composer: NarrativeComposer,
        rules: Arc<WardRules>,
    ) -> Self {
        Self {
            host,
            composer,
            rules,
        }
    }

    pub async fn character(&self, id: CharacterId) -> Result<Character, WardError> {
        self.host
            .get_character(id)
            .await?
            .ok_or(WardError::CharacterNotFound(id))
    }

    /// The pool on a character snapshot; None without a ward feature
    pub fn resource(&self, character: &Character) -> Option<WardResource> {
        let feature = ward_feature(character, &self.rules)?;
        WardResource::from_feature(character.id, feature)
    }

    /// Fresh read of a character's pool from the host
    pub async fn get_resource(&self, id: CharacterId) -> Result<Option<WardResource>, WardError> {
        let character = self.character(id).await?;
        Ok(self.resource(&character))
    }

    /// Persist a spent amount, clamped into `[0, max]`; returns the stored value
    #[instrument(skip(self, resource), fields(bearer = %resource.bearer))]
    pub async fn set_spent(&self, resource: &WardResource, spent: u32) -> Result<u32, WardError> {
        let clamped = resource.clamp_spent(spent);
        if clamped != spent {
            debug!(requested = spent, clamped, "Clamped spent amount");
        }
        self.host
            .set_item_uses_spent(resource.bearer, resource.feature, clamped)
            .await?;
        debug!(
            spent = clamped,
            current = resource.max() - clamped,
            max = resource.max(),
            "Persisted ward resource"
        );
        Ok(clamped)
    }

    /// Establish the ward on a bearer
    ///
    /// Resets the pool to full, reuses or creates the template effect on the
    /// ward feature, and links it to the create activity once. Returns the
    /// template, or None when the host data is malformed (logged, nothing
    /// mutated beyond what already succeeded).
    #[instrument(skip(self, character), fields(character = %character.id, name = %character.name))]
    pub async fn create_resource(
        &self,
        character: &Character,
    ) -> Result<Option<ActiveEffect>, WardError> {
        let Some(feature) = ward_feature(character, &self.rules) else {
            warn!("No ward feature on character");
            return Ok(None);
        };

        if let Some(existing) = protective_effect(character, &self.rules) {
            debug!(effect = %existing.id, "Protective effect already present");
        }

        let Some(mut activity) = feature
            .activity_named(&self.rules.create_activity)
            .cloned()
        else {
            let err = WardError::MissingActivity {
                item: feature.id,
                activity: self.rules.create_activity.clone(),
            };
            error!("{}", err);
            return Ok(None);
        };

        if let Some(resource) = WardResource::from_feature(character.id, feature) {
            self.set_spent(&resource, 0).await?;
        }

        let template = match feature.effect_named(&self.rules.effect_name) {
            Some(template) => {
                debug!(effect = %template.id, "Reusing template effect");
                template.clone()
            }
            None => {
                let template = ActiveEffect::ward_template(
                    self.rules.effect_name.clone(),
                    self.composer.text(keys::EFFECT_LABEL, &[]),
                    feature.description.clone(),
                    self.rules.effect_icon.clone(),
                    feature.id,
                );
                self.host
                    .create_item_effect(character.id, feature.id, template.clone())
                    .await?;
                info!(effect = %template.id, "Created template effect on ward feature");
                template
            }
        };

        if activity.link_effect(template.id) {
            let activities = feature
                .activities
                .iter()
                .map(|a| if a.id == activity.id { activity.clone() } else { a.clone() })
                .collect();
            self.host
                .set_item_activities(character.id, feature.id, activities)
                .await?;
            info!(activity = %activity.name, effect = %template.id, "Linked effect to activity");
        } else {
            debug!(activity = %activity.name, effect = %template.id, "Effect already linked");
        }

        Ok(Some(template))
    }
}
