//! The session document.

use std::collections::HashMap;

use fireside_dice::DiceRoll;
use fireside_narrative::Chronicle;
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::domain::player::Player;

/// Lifecycle of a session. Moves from `Init` to `Running` once and stays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Init,
    Running,
}

impl Phase {
    /// Numeric code used on the wire.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Init => 0,
            Self::Running => 1,
        }
    }
}

impl Serialize for Phase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Everything viewers of a session can see.
///
/// The serialized form is what `full_overwrite` carries; every `set`/`push`
/// path addresses a field of it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub id: Uuid,
    pub ai: Chronicle,
    pub players: HashMap<String, Player>,
    pub roll: Option<DiceRoll>,
    pub state: Phase,
    pub accepting_input: bool,
}

impl SessionState {
    /// A fresh session waiting for its players.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ai: Chronicle::default(),
            players: HashMap::new(),
            roll: None,
            state: Phase::Init,
            accepting_input: false,
        }
    }

    /// Input is only taken while running with no check pending.
    #[must_use]
    pub fn can_take_input(&self) -> bool {
        self.state == Phase::Running && self.roll.is_none() && self.accepting_input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_session_document_shape() {
        let id = Uuid::new_v4();

        let json = serde_json::to_value(SessionState::new(id)).unwrap();

        assert_eq!(json["id"], json!(id.to_string()));
        assert_eq!(json["state"], json!(0));
        assert_eq!(json["accepting_input"], json!(false));
        assert!(json["roll"].is_null());
        assert_eq!(json["players"], json!({}));
        assert_eq!(json["ai"]["chat_history"], json!([]));
    }

    #[test]
    fn test_running_phase_serializes_as_one() {
        assert_eq!(serde_json::to_value(Phase::Running).unwrap(), json!(1));
    }

    #[test]
    fn test_pending_roll_blocks_input() {
        let mut state = SessionState::new(Uuid::new_v4());
        state.state = Phase::Running;
        state.accepting_input = true;
        assert!(state.can_take_input());

        state.roll = Some(DiceRoll {
            difficulty: 10,
            result: 3,
        });

        assert!(!state.can_take_input());
    }
}
