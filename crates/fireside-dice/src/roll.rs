//! Dice check values.

use serde::{Deserialize, Serialize};

/// Lowest face of the die.
pub const MIN_FACE: u8 = 1;
/// Highest face of the die.
pub const MAX_FACE: u8 = 20;

/// Outcome of comparing a roll against its difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// `result >= difficulty`.
    Success,
    /// `result < difficulty`.
    Failure,
}

/// A rolled check waiting to be resolved by the players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    /// Target number, in `[MIN_FACE, MAX_FACE]`.
    pub difficulty: u8,
    /// Karmically adjusted result, in `[MIN_FACE, MAX_FACE]`.
    pub result: u8,
}

impl DiceRoll {
    /// Compares the result against the difficulty.
    #[must_use]
    pub fn outcome(&self) -> CheckOutcome {
        if self.result >= self.difficulty {
            CheckOutcome::Success
        } else {
            CheckOutcome::Failure
        }
    }
}

/// Clamps an arbitrary requested difficulty onto the die.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_face(value: i64) -> u8 {
    value.clamp(i64::from(MIN_FACE), i64::from(MAX_FACE)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_the_difficulty_is_a_success() {
        let roll = DiceRoll {
            difficulty: 12,
            result: 12,
        };

        assert_eq!(roll.outcome(), CheckOutcome::Success);
    }

    #[test]
    fn test_falling_short_is_a_failure() {
        let roll = DiceRoll {
            difficulty: 12,
            result: 11,
        };

        assert_eq!(roll.outcome(), CheckOutcome::Failure);
    }

    #[test]
    fn test_clamp_face_bounds_requests() {
        assert_eq!(clamp_face(-3), MIN_FACE);
        assert_eq!(clamp_face(0), MIN_FACE);
        assert_eq!(clamp_face(7), 7);
        assert_eq!(clamp_face(400), MAX_FACE);
    }

    #[test]
    fn test_roll_serializes_as_plain_pair() {
        let roll = DiceRoll {
            difficulty: 4,
            result: 5,
        };

        let json = serde_json::to_value(roll).unwrap();

        assert_eq!(json, serde_json::json!({ "difficulty": 4, "result": 5 }));
    }
}
