//! Players taking part in a session.

use serde::{Deserialize, Serialize};

/// Free-form character profile entered by a player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub name: String,
    pub age: String,
    pub origin: String,
    pub appearance: String,
}

impl PlayerProfile {
    /// The profile as entity notes for the narrator.
    #[must_use]
    pub fn memory_lines(&self) -> Vec<String> {
        vec![
            format!("name: {}", self.name),
            format!("age: {}", self.age),
            format!("appearance: {}", self.appearance),
            format!("origin: {}", self.origin),
        ]
    }
}

/// A participant, identified by their per-browser identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    #[serde(default)]
    pub description: PlayerProfile,
}

impl Player {
    /// A player who has not described their character yet.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: PlayerProfile::default(),
        }
    }
}

/// Path of a player's slot in the session document.
#[must_use]
pub fn player_path(player_id: &str) -> String {
    format!("players.{player_id}")
}
