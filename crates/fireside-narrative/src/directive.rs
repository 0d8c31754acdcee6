//! Instructions handed to the narrator.

use std::fmt;

use fireside_dice::{CheckOutcome, DiceRoll};
use tracing::warn;

/// Target level of violence for a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolenceLevel {
    None,
    Mild,
    Moderate,
    Graphic,
}

impl ViolenceLevel {
    /// Maps a client-supplied level onto the scale, clamping values past
    /// [`ViolenceLevel::Graphic`].
    #[must_use]
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Self::None,
            1 => Self::Mild,
            2 => Self::Moderate,
            3 => Self::Graphic,
            other => {
                warn!(requested = other, clamped = 3, "violence level out of range");
                Self::Graphic
            }
        }
    }

    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::None => "no violence at all",
            Self::Mild => "mild, mostly implied violence",
            Self::Moderate => "moderate violence, described without gore",
            Self::Graphic => "graphic violence is allowed",
        }
    }
}

impl fmt::Display for ViolenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Target length of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignLength {
    OneShot,
    Short,
    Campaign,
}

impl CampaignLength {
    /// Maps a client-supplied duration onto the scale, clamping values past
    /// [`CampaignLength::Campaign`].
    #[must_use]
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Self::OneShot,
            1 => Self::Short,
            2 => Self::Campaign,
            other => {
                warn!(requested = other, clamped = 2, "campaign length out of range");
                Self::Campaign
            }
        }
    }

    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::OneShot => "a one-shot of a single evening",
            Self::Short => "a short adventure over a few sessions",
            Self::Campaign => "a long campaign",
        }
    }
}

impl fmt::Display for CampaignLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Scenario text augmented with the tone and length targets.
#[must_use]
pub fn opening_seed(scenario: &str, violence: ViolenceLevel, length: CampaignLength) -> String {
    format!(
        "{}\n\nTarget violence level: {violence}\n\nTarget length of the whole campaign: {length}",
        scenario.trim_end()
    )
}

#[must_use]
pub fn opening() -> String {
    "Begin the story. Introduce the setting and every player character.".to_owned()
}

#[must_use]
pub fn after_input(player_id: &str) -> String {
    format!("Continue the story after the input of player {player_id}.")
}

#[must_use]
pub fn after_roll(roll: &DiceRoll) -> String {
    let verdict = match roll.outcome() {
        CheckOutcome::Success => "succeeded",
        CheckOutcome::Failure => "failed",
    };
    format!(
        "A {} against difficulty {} was rolled, so the check {verdict}. Continue the story.",
        roll.result, roll.difficulty
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_in_range_map_directly() {
        assert_eq!(ViolenceLevel::from_level(0), ViolenceLevel::None);
        assert_eq!(ViolenceLevel::from_level(2), ViolenceLevel::Moderate);
        assert_eq!(CampaignLength::from_level(1), CampaignLength::Short);
    }

    #[test]
    fn test_out_of_range_levels_clamp_to_highest() {
        assert_eq!(ViolenceLevel::from_level(9), ViolenceLevel::Graphic);
        assert_eq!(CampaignLength::from_level(255), CampaignLength::Campaign);
    }

    #[test]
    fn test_opening_seed_appends_targets() {
        let seed = opening_seed(
            "A heist in the drowned city.\n",
            ViolenceLevel::Mild,
            CampaignLength::OneShot,
        );

        assert_eq!(
            seed,
            "A heist in the drowned city.\n\n\
             Target violence level: mild, mostly implied violence\n\n\
             Target length of the whole campaign: a one-shot of a single evening"
        );
    }

    #[test]
    fn test_after_roll_reports_success_when_difficulty_met() {
        let text = after_roll(&DiceRoll {
            difficulty: 12,
            result: 12,
        });

        assert!(text.contains("A 12 against difficulty 12"));
        assert!(text.contains("succeeded"));
    }

    #[test]
    fn test_after_roll_reports_failure_below_difficulty() {
        let text = after_roll(&DiceRoll {
            difficulty: 15,
            result: 4,
        });

        assert!(text.contains("failed"));
    }

    #[test]
    fn test_after_input_names_player() {
        assert!(after_input("p7").contains("player p7"));
    }
}
