//! Eligibility predicates
//!
//! Pure checks deciding whether a character bears a ward and whether an
//! item charges one. Absence of any feature or effect simply yields false.

use crate::domain::entities::{ActiveEffect, Character, Item, ItemKind};
use crate::domain::value_objects::WardRules;

/// True when the character carries the eligible subclass
pub fn is_ward_bearer(character: &Character, rules: &WardRules) -> bool {
    character
        .find_item(ItemKind::Subclass, &rules.eligible_subclass)
        .is_some()
}

/// True when the item is a spell of one of the charging schools
pub fn is_charging_action(item: &Item, rules: &WardRules) -> bool {
    let Some(spell) = &item.spell else {
        return false;
    };
    let school = spell.school.to_lowercase();
    if school.is_empty() {
        return false;
    }
    rules
        .charging_schools
        .iter()
        .any(|candidate| school.contains(&candidate.to_lowercase()))
}

/// True when the character has the ward feature
pub fn has_ward_resource(character: &Character, rules: &WardRules) -> bool {
    ward_feature(character, rules).is_some()
}

/// True when the protective effect is applied to the character
pub fn has_protective_effect(character: &Character, rules: &WardRules) -> bool {
    protective_effect(character, rules).is_some()
}

/// True when the character can project their ward onto others
pub fn has_projected_ward(character: &Character, rules: &WardRules) -> bool {
    character
        .find_item(ItemKind::Feat, &rules.projected_ward_feature)
        .is_some()
}

pub fn ward_feature<'a>(character: &'a Character, rules: &WardRules) -> Option<&'a Item> {
    character.find_item(ItemKind::Feat, &rules.ward_feature)
}

pub fn protective_effect<'a>(
    character: &'a Character,
    rules: &WardRules,
) -> Option<&'a ActiveEffect> {
    character.effect_named(&rules.effect_name)
}
