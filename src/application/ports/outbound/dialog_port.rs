use std::time::Duration;

use async_trait::async_trait;

use crate::domain::value_objects::DialogAnswer;

/// A localized yes/no prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogPrompt {
    pub title: String,
    pub content: String,
    pub yes_label: String,
    pub no_label: String,
    /// Auto-dismiss after this long
    pub timeout: Option<Duration>,
}

/// Port for interactive prompts shown to the local user
#[async_trait]
pub trait DialogPort: Send + Sync {
    /// Resolves `No` when the dialog is dismissed or times out
    async fn confirm(&self, prompt: DialogPrompt) -> DialogAnswer;
}
