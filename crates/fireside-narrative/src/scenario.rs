//! Bundled scenario texts.

use fireside_core::error::DomainError;

const SCENARIOS: &[(&str, &str)] = &[
    ("scenario_a", include_str!("../scenarios/scenario_a.txt")),
    ("scenario_b", include_str!("../scenarios/scenario_b.txt")),
    ("scenario_c", include_str!("../scenarios/scenario_c.txt")),
];

/// Looks up the text of a bundled scenario.
///
/// # Errors
///
/// Returns [`DomainError::UnknownScenario`] if no scenario has that id.
pub fn scenario_text(id: &str) -> Result<&'static str, DomainError> {
    SCENARIOS
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, text)| *text)
        .ok_or_else(|| DomainError::UnknownScenario(id.to_owned()))
}

/// Ids of every bundled scenario.
pub fn scenario_ids() -> impl Iterator<Item = &'static str> {
    SCENARIOS.iter().map(|(id, _)| *id)
}
