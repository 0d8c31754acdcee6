//! Fireside: karmic dice law.
//!
//! Responsible for d20 checks whose odds drift toward fairness: a run of
//! failures raises the next results, a run of successes lowers them.

pub mod karmic;
pub mod roll;

pub use karmic::KarmicDice;
pub use roll::{CheckOutcome, DiceRoll};
