//! Scripted randomness for dice tests.

use fireside_core::rng::DeterministicRng;

/// Replays a fixed list of base rolls, starting over after the last one.
/// The requested range is ignored, so tests can feed out-of-range values
/// to exercise clamping.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    next: usize,
}

impl SequenceRng {
    /// # Panics
    ///
    /// Panics if `values` is empty.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        assert!(!values.is_empty(), "SequenceRng needs at least one value");
        Self { values, next: 0 }
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let value = self.values[self.next];
        self.next = (self.next + 1) % self.values.len();
        value
    }
}
