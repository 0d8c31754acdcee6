//! Fireside: sessions.
//!
//! Owns every running story: the per-session actor that serializes
//! mutations and publishes their deltas, the registry that maps identifiers
//! to sessions, and the background pass that attaches synthesized audio to
//! narration.

pub mod application;
pub mod domain;

pub use application::context::SessionContext;
pub use application::registry::SessionRegistry;
pub use application::session::Session;
pub use domain::player::{Player, PlayerProfile};
pub use domain::state::{Phase, SessionState};
