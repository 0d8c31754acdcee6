//! Narrative collaborator seam.
//!
//! The generative text model lives outside this system. Sessions talk to it
//! through [`Narrator`], handing over an instruction plus the current story
//! context and receiving a structured continuation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// One request for a story continuation.
#[derive(Debug, Clone, Serialize)]
pub struct NarrationRequest {
    /// The session asking for narration.
    pub session_id: Uuid,
    /// What the narrator should do next (open, continue after input, ...).
    pub instruction: String,
    /// Serialized narrative memory and chat history.
    pub context: serde_json::Value,
}

/// A note about a named entity (character, place, group, object).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityNote {
    /// Entity name, e.g. `player_<id>` or `tavern_keeper`.
    pub entity: String,
    /// One fact about the entity.
    pub data: String,
}

/// A dice check requested by the narrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRequest {
    /// Target number the player must reach.
    pub difficulty: i64,
}

/// Structured continuation returned by the narrator.
///
/// Only `narrator_text` and `roll_dice` are shown to players; everything
/// else feeds the session's narrative memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorResponse {
    /// Text spoken to the players.
    pub narrator_text: String,
    /// Where the players currently are.
    pub place: Option<String>,
    /// New entries for the story plan.
    pub event_plan: Vec<String>,
    /// New long-lived facts.
    pub event_long_history: Vec<String>,
    /// New short-lived, place-bound facts.
    pub event_short_history: Vec<String>,
    /// New entity facts.
    pub entity_data: Vec<EntityNote>,
    /// Optional dice check for the players.
    pub roll_dice: Option<RollRequest>,
}

/// External text-generation service producing story continuations.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Produce the next story beat for `request`.
    async fn narrate(&self, request: NarrationRequest) -> Result<NarratorResponse, DomainError>;
}
