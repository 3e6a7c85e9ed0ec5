//! In-memory host - Character registry, chat log and scene geometry
//!
//! Backs headless sessions and tests. Several participants may share one
//! instance, the way they share one host world.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock as StdRwLock};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{
    ChatMessage, ChatPort, DialogPort, DialogPrompt, GeometryPort, HostDataPort, HostError,
};
use crate::domain::entities::{ActiveEffect, Activity, Character, Item, ItemUses, WardFlags};
use crate::domain::value_objects::{CharacterId, DialogAnswer, EffectId, ItemId, MessageId};

/// Token position on the active scene
#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f64,
    y: f64,
}

#[derive(Default)]
pub struct InMemoryHost {
    characters: RwLock<Vec<Character>>,
    messages: RwLock<Vec<(MessageId, ChatMessage)>>,
    bubbles: RwLock<Vec<(CharacterId, MessageId)>>,
    positions: StdRwLock<HashMap<CharacterId, Position>>,
    blocked: StdRwLock<HashSet<(CharacterId, CharacterId)>>,
    fail_writes: AtomicBool,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a character, keeping enumeration order
    pub async fn insert(&self, character: Character) {
        self.characters.write().await.push(character);
    }

    pub async fn snapshot(&self, id: CharacterId) -> Option<Character> {
        self.characters
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    pub fn place(&self, id: CharacterId, x: f64, y: f64) {
        self.positions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, Position { x, y });
    }

    /// Mark the line between two tokens as blocked in both directions
    pub fn block_line(&self, a: CharacterId, b: CharacterId) {
        let mut blocked = self.blocked.write().unwrap_or_else(|e| e.into_inner());
        blocked.insert((a, b));
        blocked.insert((b, a));
    }

    /// Make every subsequent write fail with a storage error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages
            .read()
            .await
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub async fn bubbles(&self) -> Vec<(CharacterId, MessageId)> {
        self.bubbles.read().await.clone()
    }

    fn check_writable(&self) -> Result<(), HostError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(HostError::Storage("writes disabled".to_string()));
        }
        Ok(())
    }

    async fn update_character<T>(
        &self,
        id: CharacterId,
        f: impl FnOnce(&mut Character) -> Result<T, HostError> + Send,
    ) -> Result<T, HostError> {
        self.check_writable()?;
        let mut characters = self.characters.write().await;
        let character = characters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(HostError::CharacterNotFound(id))?;
        f(character)
    }

    async fn update_item(
        &self,
        character: CharacterId,
        item: ItemId,
        f: impl FnOnce(&mut Item) + Send,
    ) -> Result<(), HostError> {
        self.update_character(character, |c| {
            let target = c.item_mut(item).ok_or(HostError::ItemNotFound(item))?;
            f(target);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl HostDataPort for InMemoryHost {
    async fn get_character(&self, id: CharacterId) -> Result<Option<Character>, HostError> {
        Ok(self.snapshot(id).await)
    }

    async fn list_characters(&self) -> Result<Vec<Character>, HostError> {
        Ok(self.characters.read().await.clone())
    }

    async fn set_item_uses_spent(
        &self,
        character: CharacterId,
        item: ItemId,
        spent: u32,
    ) -> Result<(), HostError> {
        self.update_item(character, item, |item| {
            let max = item.uses.map_or(0, |uses| uses.max);
            item.uses = Some(ItemUses::new(spent.min(max), max));
        })
        .await
    }

    async fn create_item_effect(
        &self,
        character: CharacterId,
        item: ItemId,
        effect: ActiveEffect,
    ) -> Result<(), HostError> {
        self.update_item(character, item, |item| item.effects.push(effect))
            .await
    }

    async fn set_item_activities(
        &self,
        character: CharacterId,
        item: ItemId,
        activities: Vec<Activity>,
    ) -> Result<(), HostError> {
        self.update_item(character, item, |item| item.activities = activities)
            .await
    }

    async fn set_item_flags(
        &self,
        character: CharacterId,
        item: ItemId,
        flags: WardFlags,
    ) -> Result<(), HostError> {
        self.update_item(character, item, |item| item.flags = flags)
            .await
    }

    async fn create_character_effect(
        &self,
        character: CharacterId,
        effect: ActiveEffect,
    ) -> Result<(), HostError> {
        self.update_character(character, |c| {
            c.effects.push(effect);
            Ok(())
        })
        .await
    }

    async fn delete_character_effect(
        &self,
        character: CharacterId,
        effect: EffectId,
    ) -> Result<(), HostError> {
        self.update_character(character, |c| {
            c.remove_effect(effect)
                .map(|_| ())
                .ok_or(HostError::EffectNotFound(effect))
        })
        .await
    }
}

#[async_trait]
impl ChatPort for InMemoryHost {
    async fn create_message(&self, message: &ChatMessage) -> Result<MessageId, HostError> {
        let id = MessageId::new();
        self.messages.write().await.push((id, message.clone()));
        Ok(id)
    }

    async fn show_bubble(&self, speaker: CharacterId, message: MessageId) -> Result<(), HostError> {
        self.bubbles.write().await.push((speaker, message));
        Ok(())
    }
}

impl GeometryPort for InMemoryHost {
    fn distance(&self, from: CharacterId, to: CharacterId) -> Option<f64> {
        if self
            .blocked
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&(from, to))
        {
            return None;
        }
        let positions = self.positions.read().unwrap_or_else(|e| e.into_inner());
        let a = positions.get(&from)?;
        let b = positions.get(&to)?;
        Some((a.x - b.x).hypot(a.y - b.y))
    }
}

/// Dialog adapter answering from a queue of scripted answers
///
/// With no answer queued, a prompt carrying a timeout waits it out and
/// resolves `No`; one without resolves `No` at once, as if dismissed.
#[derive(Default)]
pub struct ScriptedDialogs {
    answers: Mutex<VecDeque<DialogAnswer>>,
    prompts: Mutex<Vec<DialogPrompt>>,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_answer(&self, answer: DialogAnswer) {
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(answer);
    }

    /// Every prompt shown so far
    pub fn prompts(&self) -> Vec<DialogPrompt> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl DialogPort for ScriptedDialogs {
    async fn confirm(&self, prompt: DialogPrompt) -> DialogAnswer {
        let timeout = prompt.timeout;
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt);
        let answer = self
            .answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match (answer, timeout) {
            (Some(answer), _) => answer,
            (None, Some(timeout)) => {
                tokio::time::sleep(timeout).await;
                DialogAnswer::No
            }
            (None, None) => DialogAnswer::No,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ActorKind, ItemKind};

    #[tokio::test]
    async fn test_spent_is_clamped_to_max() {
        let host = InMemoryHost::new();
        let feature = Item::new("Arcane Ward", ItemKind::Feat).with_uses(0, 10);
        let feature_id = feature.id;
        let mira = Character::new("Mira", ActorKind::Character).with_item(feature);
        let mira_id = mira.id;
        host.insert(mira).await;

        host.set_item_uses_spent(mira_id, feature_id, 40).await.unwrap();

        let stored = host.snapshot(mira_id).await.unwrap();
        assert_eq!(stored.item(feature_id).unwrap().uses, Some(ItemUses::new(10, 10)));
    }

    #[tokio::test]
    async fn test_missing_records_are_reported() {
        let host = InMemoryHost::new();
        let mira = Character::new("Mira", ActorKind::Character);
        let mira_id = mira.id;
        host.insert(mira).await;

        assert!(matches!(
            host.set_item_uses_spent(CharacterId::new(), ItemId::new(), 1).await,
            Err(HostError::CharacterNotFound(_))
        ));
        assert!(matches!(
            host.set_item_uses_spent(mira_id, ItemId::new(), 1).await,
            Err(HostError::ItemNotFound(_))
        ));
        assert!(matches!(
            host.delete_character_effect(mira_id, EffectId::new()).await,
            Err(HostError::EffectNotFound(_))
        ));
    }

    #[test]
    fn test_distance_honours_blocked_lines() {
        let host = InMemoryHost::new();
        let (a, b, c) = (CharacterId::new(), CharacterId::new(), CharacterId::new());
        host.place(a, 0.0, 0.0);
        host.place(b, 3.0, 4.0);

        assert_eq!(host.distance(a, b), Some(5.0));
        assert_eq!(host.distance(a, c), None);

        host.block_line(a, b);
        assert_eq!(host.distance(b, a), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_prompt_waits_for_its_timeout() {
        let dialogs = ScriptedDialogs::new();
        let prompt = DialogPrompt {
            title: "Arcane Ward".to_string(),
            content: String::new(),
            yes_label: "Yes".to_string(),
            no_label: "No".to_string(),
            timeout: Some(std::time::Duration::from_secs(30)),
        };

        let started = tokio::time::Instant::now();
        assert_eq!(dialogs.confirm(prompt).await, DialogAnswer::No);
        assert!(started.elapsed() >= std::time::Duration::from_secs(30));
        assert_eq!(dialogs.prompts().len(), 1);
    }
}
