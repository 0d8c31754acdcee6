//! The narrator-facing part of a session document.

use fireside_core::narrator::NarratorResponse;
use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::memory::NarrativeMemory;

/// Narrative memory plus the visible chat history.
///
/// Serialized under the `ai` key of the session document, with the memory
/// fields flattened next to `chat_history`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chronicle {
    #[serde(flatten)]
    pub memory: NarrativeMemory,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
}

impl Chronicle {
    /// Appends a message, returning its index.
    pub fn push(&mut self, message: ChatMessage) -> usize {
        self.chat_history.push(message);
        self.chat_history.len() - 1
    }

    /// Folds a narrator response into memory and appends its narration.
    /// Returns the index of the new narrator message.
    pub fn record(&mut self, response: &NarratorResponse, stamp: &str) -> usize {
        self.memory.apply(response, stamp);
        self.push(ChatMessage::narrator(response.narrator_text.clone()))
    }

    /// Indices of narrator messages still missing audio.
    #[must_use]
    pub fn missing_audio(&self) -> Vec<usize> {
        self.chat_history
            .iter()
            .enumerate()
            .filter(|(_, message)| message.needs_audio())
            .map(|(index, _)| index)
            .collect()
    }

    /// The context handed to the narrator alongside each instruction.
    #[must_use]
    pub fn context(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

/// Path of the chat history sequence in the session document.
pub const CHAT_HISTORY_PATH: &str = "ai.chat_history";

/// Path of one message's audio slot in the session document.
#[must_use]
pub fn audio_path(index: usize) -> String {
    format!("{CHAT_HISTORY_PATH}.{index}.audio")
}
