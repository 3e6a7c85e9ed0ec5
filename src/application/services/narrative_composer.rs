//! Narrative Composer - Builds localized chat messages and prompts
//!
//! Every player-facing string goes through the localization port. Random
//! choices (perspective, phrase) go through the random port so tests can
//! pin them.

use std::sync::Arc;
use std::time::Duration;

use crate::application::errors::WardError;
use crate::application::ports::outbound::{
    fill_placeholders, ChatMessage, DialogPrompt, LocalizationPort, RandomPort,
};
use crate::domain::entities::{Absorption, Item};
use crate::domain::events::SheetControl;
use crate::domain::value_objects::CharacterId;

/// Dotted keys into the phrase catalog
pub mod keys {
    pub const MISSING_FEATURE: &str = "ARCANE_WARDING.MISSING_FEATURE";
    pub const EFFECT_NAME: &str = "ARCANE_WARDING.EFFECT_NAME";
    pub const EFFECT_LABEL: &str = "ARCANE_WARDING.EFFECT_LABEL";
    pub const EFFECT_CREATED: &str = "ARCANE_WARDING.EFFECT_CREATED";
    pub const WARD_AT_MAX: &str = "ARCANE_WARDING.WARD_AT_MAX";
    pub const WARD_HEALED: &str = "ARCANE_WARDING.WARD_HEALED";
    pub const LONG_REST: &str = "ARCANE_WARDING.LONG_REST";

    pub const ABSORBED_BASE: &str = "ARCANE_WARDING.ABSORBED_MESSAGE_BASE";
    pub const ABSORBED_0HP: &str = "ARCANE_WARDING.ABSORBED_MESSAGE_0HP";
    pub const ABSORBED_REMAINING: &str = "ARCANE_WARDING.ABSORBED_MESSAGE_REMAINING_DMG";
    pub const ABSORBED_NO_DMG: &str = "ARCANE_WARDING.ABSORBED_MESSAGE_NO_DMG";
    pub const ABSORBED_SUCCESS: &str = "ARCANE_WARDING.ABSORBED_MESSAGE_SUCCESS";

    pub const DIALOG_TITLE: &str = "ARCANE_WARDING.DIALOG_TITLE";
    pub const DIALOG_CONTENT: &str = "ARCANE_WARDING.DIALOG_CONTENT";
    pub const LABEL_YES: &str = "ARCANE_WARDING.LABEL_YES";
    pub const LABEL_NO: &str = "ARCANE_WARDING.LABEL_NO";
    pub const UNKNOWN_ATTACKER: &str = "ARCANE_WARDING.UNKNOWN_ATTACKER";

    pub const TOGGLE_TITLE: &str = "ARCANE_WARDING.TOGGLE.TITLE";
    pub const TOGGLE_ENABLED: &str = "ARCANE_WARDING.TOGGLE.ENABLED";
    pub const TOGGLE_DISABLED: &str = "ARCANE_WARDING.TOGGLE.DISABLED";

    pub const PROJECTED_DIALOG_TITLE: &str = "ARCANE_WARDING.PROJECTED_WARD.DIALOG_TITLE";
    pub const PROJECTED_DIALOG_CONTENT: &str = "ARCANE_WARDING.PROJECTED_WARD.DIALOG_CONTENT";
    pub const PROJECTED_APPLIED: &str = "ARCANE_WARDING.PROJECTED_WARD.APPLIED";
    pub const PROJECTED_ABSORBED_BASE: &str =
        "ARCANE_WARDING.PROJECTED_WARD.ABSORBED_MESSAGE_BASE";
    pub const PROJECTED_ABSORBED_0HP: &str = "ARCANE_WARDING.PROJECTED_WARD.ABSORBED_MESSAGE_0HP";
    pub const PROJECTED_ABSORBED_REMAINING: &str =
        "ARCANE_WARDING.PROJECTED_WARD.ABSORBED_MESSAGE_REMAINING_DMG";
    pub const PROJECTED_ABSORBED_NO_DMG: &str =
        "ARCANE_WARDING.PROJECTED_WARD.ABSORBED_MESSAGE_NO_DMG";
    pub const PROJECTED_ABSORBED_SUCCESS: &str =
        "ARCANE_WARDING.PROJECTED_WARD.ABSORBED_MESSAGE_SUCCESS";

    pub const WITTY_FIRST_PERSON: &str = "ARCANE_WARDING.WITTY_MESSAGES.FIRST_PERSON";
    pub const WITTY_THIRD_PERSON: &str = "ARCANE_WARDING.WITTY_MESSAGES.THIRD_PERSON";

    /// Single templates a catalog must define
    pub const REQUIRED: &[&str] = &[
        MISSING_FEATURE,
        EFFECT_NAME,
        EFFECT_LABEL,
        EFFECT_CREATED,
        WARD_AT_MAX,
        WARD_HEALED,
        LONG_REST,
        ABSORBED_BASE,
        ABSORBED_0HP,
        ABSORBED_REMAINING,
        ABSORBED_NO_DMG,
        ABSORBED_SUCCESS,
        DIALOG_TITLE,
        DIALOG_CONTENT,
        LABEL_YES,
        LABEL_NO,
        UNKNOWN_ATTACKER,
        TOGGLE_TITLE,
        TOGGLE_ENABLED,
        TOGGLE_DISABLED,
        PROJECTED_DIALOG_TITLE,
        PROJECTED_DIALOG_CONTENT,
        PROJECTED_APPLIED,
        PROJECTED_ABSORBED_BASE,
        PROJECTED_ABSORBED_0HP,
        PROJECTED_ABSORBED_REMAINING,
        PROJECTED_ABSORBED_NO_DMG,
        PROJECTED_ABSORBED_SUCCESS,
    ];

    /// Phrase lists a catalog must define with at least one entry
    pub const PHRASE_LISTS: &[&str] = &[WITTY_FIRST_PERSON, WITTY_THIRD_PERSON];
}

/// Grammatical voice of a witty remark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    /// Spoken by the bearer, shown as an emote and a speech bubble
    FirstPerson,
    /// Narrated about the bearer
    ThirdPerson,
}

/// A composed remark and how to present it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WittyRemark {
    pub perspective: Perspective,
    pub message: ChatMessage,
    pub use_bubble: bool,
}

/// Key set for one flavour of absorption report
struct AbsorptionKeys {
    base: &'static str,
    depleted: &'static str,
    remaining: &'static str,
    no_damage: &'static str,
    success: &'static str,
}

const OWN_WARD: AbsorptionKeys = AbsorptionKeys {
    base: keys::ABSORBED_BASE,
    depleted: keys::ABSORBED_0HP,
    remaining: keys::ABSORBED_REMAINING,
    no_damage: keys::ABSORBED_NO_DMG,
    success: keys::ABSORBED_SUCCESS,
};

const PROJECTED_WARD: AbsorptionKeys = AbsorptionKeys {
    base: keys::PROJECTED_ABSORBED_BASE,
    depleted: keys::PROJECTED_ABSORBED_0HP,
    remaining: keys::PROJECTED_ABSORBED_REMAINING,
    no_damage: keys::PROJECTED_ABSORBED_NO_DMG,
    success: keys::PROJECTED_ABSORBED_SUCCESS,
};

#[derive(Clone)]
pub struct NarrativeComposer {
    localization: Arc<dyn LocalizationPort>,
    random: Arc<dyn RandomPort>,
}

impl NarrativeComposer {
    pub fn new(localization: Arc<dyn LocalizationPort>, random: Arc<dyn RandomPort>) -> Self {
        Self {
            localization,
            random,
        }
    }

    pub fn text(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.localization.format(key, params)
    }

    /// A public announcement spoken by `speaker`
    pub fn announcement(
        &self,
        speaker: CharacterId,
        key: &str,
        params: &[(&str, &str)],
    ) -> ChatMessage {
        ChatMessage::announcement(speaker, self.text(key, params))
    }

    /// Report of the bearer's own ward absorbing damage
    pub fn absorption(
        &self,
        speaker: CharacterId,
        actor: &str,
        absorption: &Absorption,
    ) -> ChatMessage {
        let amount = absorption.absorbed.to_string();
        let remaining = absorption.remaining.to_string();
        let params = [
            ("actor", actor),
            ("amount", amount.as_str()),
            ("remaining", remaining.as_str()),
        ];
        ChatMessage::announcement(speaker, self.absorption_text(&OWN_WARD, absorption, &params))
    }

    /// Report of a projected ward absorbing damage aimed at another character
    pub fn projected_absorption(
        &self,
        speaker: CharacterId,
        bearer: &str,
        attacker: &str,
        target: &str,
        absorption: &Absorption,
    ) -> ChatMessage {
        let amount = absorption.absorbed.to_string();
        let remaining = absorption.remaining.to_string();
        let params = [
            ("actor", bearer),
            ("attacker", attacker),
            ("target", target),
            ("amount", amount.as_str()),
            ("remaining", remaining.as_str()),
        ];
        ChatMessage::announcement(
            speaker,
            self.absorption_text(&PROJECTED_WARD, absorption, &params),
        )
    }

    fn absorption_text(
        &self,
        keys: &AbsorptionKeys,
        absorption: &Absorption,
        params: &[(&str, &str)],
    ) -> String {
        let mut text = self.text(keys.base, params);
        if absorption.depleted() {
            text.push_str(&self.text(keys.depleted, params));
            if absorption.remaining > 0 {
                text.push_str(&self.text(keys.remaining, params));
            } else {
                text.push_str(&self.text(keys.no_damage, params));
            }
        } else {
            text.push_str(&self.text(keys.success, params));
        }
        text
    }

    /// Pick a perspective and a phrase for a fully blocked hit
    ///
    /// `attacker` falls back to a localized placeholder when unknown.
    pub fn witty_remark(
        &self,
        speaker: CharacterId,
        actor: &str,
        attacker: Option<&str>,
    ) -> Result<WittyRemark, WardError> {
        let perspective = if self.random.gen_bool(0.5) {
            Perspective::FirstPerson
        } else {
            Perspective::ThirdPerson
        };
        let key = match perspective {
            Perspective::FirstPerson => keys::WITTY_FIRST_PERSON,
            Perspective::ThirdPerson => keys::WITTY_THIRD_PERSON,
        };

        let phrases = self.localization.phrase_list(key);
        if phrases.is_empty() {
            return Err(WardError::MissingPhrases(key.to_string()));
        }
        let phrase = &phrases[self.random.gen_index(phrases.len())];

        let unknown = self.text(keys::UNKNOWN_ATTACKER, &[]);
        let attacker = attacker.unwrap_or(&unknown);
        let line = fill_placeholders(phrase, &[("actor", actor), ("target", attacker)]);

        Ok(match perspective {
            Perspective::FirstPerson => WittyRemark {
                perspective,
                message: ChatMessage::emote(speaker, format!("<p>{}.</p>", line)),
                use_bubble: true,
            },
            Perspective::ThirdPerson => WittyRemark {
                perspective,
                message: ChatMessage::announcement(
                    speaker,
                    format!("<p><strong>{}</strong> {}.</p>", actor, line),
                ),
                use_bubble: false,
            },
        })
    }

    /// Prompt offering to create the ward after a charging spell
    pub fn create_ward_prompt(&self, spell: &str, timeout: Option<Duration>) -> DialogPrompt {
        DialogPrompt {
            title: self.text(keys::DIALOG_TITLE, &[]),
            content: self.text(keys::DIALOG_CONTENT, &[("spell", spell)]),
            yes_label: self.text(keys::LABEL_YES, &[]),
            no_label: self.text(keys::LABEL_NO, &[]),
            timeout,
        }
    }

    /// Prompt offering to project a bearer's ward onto an attacked ally
    pub fn projected_ward_prompt(
        &self,
        bearer: &str,
        attacker: &str,
        target: &str,
        spell: &str,
        timeout: Option<Duration>,
    ) -> DialogPrompt {
        let params = [
            ("actor", bearer),
            ("attacker", attacker),
            ("target", target),
            ("spell", spell),
        ];
        DialogPrompt {
            title: self.text(keys::PROJECTED_DIALOG_TITLE, &[]),
            content: self.text(keys::PROJECTED_DIALOG_CONTENT, &params),
            yes_label: self.text(keys::LABEL_YES, &[]),
            no_label: self.text(keys::LABEL_NO, &[]),
            timeout,
        }
    }

    /// Sheet control reflecting the feature's verbose messaging flag
    pub fn verbose_toggle(&self, feature: &Item) -> SheetControl {
        let enabled = feature.flags.verbose_messaging;
        let label = if enabled {
            keys::TOGGLE_ENABLED
        } else {
            keys::TOGGLE_DISABLED
        };
        SheetControl {
            item: feature.id,
            title: self.text(keys::TOGGLE_TITLE, &[]),
            label: self.text(label, &[]),
            enabled,
        }
    }
}
