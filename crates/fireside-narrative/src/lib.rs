//! Narrative state of a session: what the narrator remembers, what the
//! players have seen, and the instructions that drive each turn.

pub mod chat;
pub mod chronicle;
pub mod directive;
pub mod memory;
pub mod scenario;

pub use chat::{ChatMessage, Role};
pub use chronicle::Chronicle;
pub use directive::{CampaignLength, ViolenceLevel};
pub use memory::NarrativeMemory;
