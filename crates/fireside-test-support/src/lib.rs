//! Shared test doubles and utilities for the Fireside server.

mod clock;
mod frames;
mod narrator;
mod rng;
mod speech;

pub use clock::{FixedClock, fixed_instant};
pub use frames::FrameSink;
pub use narrator::{ScriptedNarrator, narration};
pub use rng::SequenceRng;
pub use speech::RecordingSpeech;
