//! Client-to-server commands.

use fireside_session::PlayerProfile;
use serde::Deserialize;
use serde_json::Value;

/// A command sent by a viewer, tagged by its `action` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientCommand {
    SetPlayerCharacterDescription {
        player: PlayerProfile,
    },
    Start {
        scenario: String,
        #[serde(default)]
        violence_level: u8,
        #[serde(default)]
        duration: u8,
    },
    UserInput {
        input: String,
    },
    ContinueAfterRoll,
}

const ACTIONS: [&str; 4] = [
    "set_player_character_description",
    "start",
    "user_input",
    "continue_after_roll",
];

/// Decodes one text frame.
///
/// Frames whose `action` is missing or unknown decode to `Ok(None)` and are
/// meant to be ignored.
///
/// # Errors
///
/// Returns an error if the frame is not JSON, or if a known action lacks
/// its fields.
pub fn decode(frame: &str) -> Result<Option<ClientCommand>, serde_json::Error> {
    let value: Value = serde_json::from_str(frame)?;
    match value.get("action").and_then(Value::as_str) {
        Some(action) if ACTIONS.contains(&action) => serde_json::from_value(value).map(Some),
        _ => Ok(None),
    }
}
