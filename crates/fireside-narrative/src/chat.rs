//! Visible chat history entries.

use serde::{Deserialize, Serialize};

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A player's input.
    User,
    /// The narrator's text.
    #[serde(alias = "model")]
    Narrator,
}

/// One entry of the chat history.
///
/// Entries never change after they are appended, except for `audio`, which
/// is filled at most once by the enrichment pass. `audio` is always
/// serialized (as `null` until filled) so viewers can address
/// `ai.chat_history.<n>.audio` directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    player_id: Option<String>,
    message: String,
    #[serde(default)]
    audio: Option<String>,
}

impl ChatMessage {
    /// A message typed by `player_id`.
    #[must_use]
    pub fn user(player_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            player_id: Some(player_id.into()),
            message: message.into(),
            audio: None,
        }
    }

    /// A message spoken by the narrator.
    #[must_use]
    pub fn narrator(message: impl Into<String>) -> Self {
        Self {
            role: Role::Narrator,
            player_id: None,
            message: message.into(),
            audio: None,
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn player_id(&self) -> Option<&str> {
        self.player_id.as_deref()
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn audio(&self) -> Option<&str> {
        self.audio.as_deref()
    }

    /// Narrator messages without audio are waiting for enrichment.
    #[must_use]
    pub fn needs_audio(&self) -> bool {
        self.role == Role::Narrator && self.audio.is_none()
    }

    /// Stores the audio reference. Returns `false`, leaving the message
    /// untouched, if it already carries audio or is not narration.
    pub fn attach_audio(&mut self, reference: String) -> bool {
        if !self.needs_audio() {
            return false;
        }
        self.audio = Some(reference);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message_wire_shape() {
        let message = ChatMessage::user("p1", "I open the door.");

        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(
            json,
            json!({
                "role": "user",
                "player_id": "p1",
                "message": "I open the door.",
                "audio": null
            })
        );
    }

    #[test]
    fn test_narrator_message_omits_player_and_keeps_audio_slot() {
        let json = serde_json::to_value(ChatMessage::narrator("Rain falls.")).unwrap();

        assert_eq!(json["role"], "narrator");
        assert!(json.get("player_id").is_none());
        assert!(json["audio"].is_null());
    }

    #[test]
    fn test_legacy_model_role_is_read_as_narrator() {
        let message: ChatMessage =
            serde_json::from_value(json!({ "role": "model", "message": "Hello." })).unwrap();

        assert_eq!(message.role(), Role::Narrator);
        assert!(message.needs_audio());
    }

    #[test]
    fn test_audio_is_attached_only_once() {
        let mut message = ChatMessage::narrator("Thunder.");

        assert!(message.attach_audio("/audio/a.ogg".into()));
        assert!(!message.attach_audio("/audio/b.ogg".into()));
        assert_eq!(message.audio(), Some("/audio/a.ogg"));
        assert!(!message.needs_audio());
    }

    #[test]
    fn test_user_messages_never_take_audio() {
        let mut message = ChatMessage::user("p1", "Hi");

        assert!(!message.needs_audio());
        assert!(!message.attach_audio("/audio/x.ogg".into()));
        assert_eq!(message.audio(), None);
    }
}
