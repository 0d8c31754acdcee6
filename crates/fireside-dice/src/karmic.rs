//! The karmic d20.
//!
//! Every roll draws a uniform base value, shifts it by the current karmic
//! weight, and clamps it onto the die. The weight then moves by
//! `factor * (difficulty - result)`: up after a failure, down after a
//! success. Because the feedback uses the adjusted result, the long-run
//! average of results settles on the difficulty being rolled against.
//!
//! One instance is shared by every session in the process. The draw and the
//! weight update happen under the same lock, so concurrent sessions never
//! lose each other's updates.

use std::sync::{Mutex, PoisonError};

use fireside_core::rng::DeterministicRng;
use tracing::{debug, warn};

use crate::roll::{DiceRoll, MAX_FACE, MIN_FACE, clamp_face};

/// Default weight change per point of shortfall or margin.
pub const DEFAULT_KARMIC_FACTOR: f64 = 0.2;

struct DiceState {
    weight: f64,
    rng: Box<dyn DeterministicRng>,
}

/// A d20 with a persistent fairness compensator.
pub struct KarmicDice {
    state: Mutex<DiceState>,
    factor: f64,
}

impl std::fmt::Debug for KarmicDice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KarmicDice")
            .field("weight", &self.weight())
            .field("factor", &self.factor)
            .finish_non_exhaustive()
    }
}

impl KarmicDice {
    /// Creates dice with a neutral weight and the default factor.
    #[must_use]
    pub fn new(rng: impl DeterministicRng + 'static) -> Self {
        Self::with_factor(rng, DEFAULT_KARMIC_FACTOR)
    }

    /// Creates dice with a neutral weight and a custom factor.
    #[must_use]
    pub fn with_factor(rng: impl DeterministicRng + 'static, factor: f64) -> Self {
        Self {
            state: Mutex::new(DiceState {
                weight: 0.0,
                rng: Box::new(rng),
            }),
            factor,
        }
    }

    /// Current karmic weight. Positive values favour the players.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .weight
    }

    /// Rolls against `difficulty`, which is clamped onto the die first.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn roll(&self, difficulty: i64) -> DiceRoll {
        let target = clamp_face(difficulty);
        if i64::from(target) != difficulty {
            warn!(requested = difficulty, clamped = target, "difficulty out of range, clamped");
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let base = state
            .rng
            .next_u32_range(u32::from(MIN_FACE), u32::from(MAX_FACE))
            .clamp(u32::from(MIN_FACE), u32::from(MAX_FACE));
        let result = (f64::from(base) + state.weight)
            .round()
            .clamp(f64::from(MIN_FACE), f64::from(MAX_FACE)) as u8;

        let delta = (f64::from(target) - f64::from(result)) * self.factor;
        state.weight += delta;

        debug!(
            base,
            result,
            difficulty = target,
            delta,
            weight = state.weight,
            "karmic roll"
        );

        DiceRoll {
            difficulty: target,
            result,
        }
    }
}
