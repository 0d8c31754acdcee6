//! Narrative memory kept between narrator turns.

use std::collections::BTreeMap;

use fireside_core::narrator::NarratorResponse;
use serde::{Deserialize, Serialize};

/// What the narrator remembers about the story so far.
///
/// Each narrator response contributes batches to the sequences below. Only
/// the first entry of every batch carries the response's timestamp, as
/// `"<RFC 3339 timestamp> <entry>"`; the rest of the batch is stored as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeMemory {
    /// Where the players currently are.
    pub place: Option<String>,
    /// The planned course of the story.
    pub event_plan: Vec<String>,
    /// Facts that stay relevant for the whole story.
    pub event_long_history: Vec<String>,
    /// Facts bound to the current place; cleared when the place changes.
    pub event_short_history: Vec<String>,
    /// Notes per named entity.
    pub entity_data: BTreeMap<String, Vec<String>>,
}

impl NarrativeMemory {
    /// Folds one narrator response into memory, stamping each batch with
    /// `stamp`.
    pub fn apply(&mut self, response: &NarratorResponse, stamp: &str) {
        if let Some(place) = response.place.as_deref().filter(|p| !p.is_empty())
            && self.place.as_deref() != Some(place)
        {
            self.event_short_history.clear();
            self.place = Some(place.to_owned());
        }

        append_batch(&mut self.event_plan, &response.event_plan, stamp);
        append_batch(
            &mut self.event_long_history,
            &response.event_long_history,
            stamp,
        );
        append_batch(
            &mut self.event_short_history,
            &response.event_short_history,
            stamp,
        );

        for (index, note) in response.entity_data.iter().enumerate() {
            let line = if index == 0 {
                stamped(stamp, &note.data)
            } else {
                note.data.clone()
            };
            self.entity_data
                .entry(note.entity.clone())
                .or_default()
                .push(line);
        }
    }

    /// Appends an unstamped plan entry, used for the opening seed.
    pub fn seed_plan(&mut self, entry: impl Into<String>) {
        self.event_plan.push(entry.into());
    }

    /// Replaces an entity's notes wholesale.
    pub fn set_entity(&mut self, entity: impl Into<String>, lines: Vec<String>) {
        let _ = self.entity_data.insert(entity.into(), lines);
    }
}

fn append_batch(target: &mut Vec<String>, batch: &[String], stamp: &str) {
    let mut entries = batch.iter();
    if let Some(first) = entries.next() {
        target.push(stamped(stamp, first));
    }
    target.extend(entries.cloned());
}

fn stamped(stamp: &str, entry: &str) -> String {
    format!("{stamp} {entry}")
}

/// Entity name under which a player's profile is remembered.
#[must_use]
pub fn player_entity(player_id: &str) -> String {
    format!("player_{player_id}")
}
