//! Test speech: a recording `SpeechSynthesizer` for tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use fireside_core::error::DomainError;
use fireside_core::speech::SpeechSynthesizer;

/// A speech synthesizer that records every text it is asked to speak and
/// returns `/audio/<n>.ogg`, where `n` counts calls from 1.
/// Texts registered with [`RecordingSpeech::failing_on`] fail instead.
#[derive(Debug, Default)]
pub struct RecordingSpeech {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingSpeech {
    /// Creates a synthesizer that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every request for `text` fail until [`RecordingSpeech::recover`].
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn failing_on(self, text: &str) -> Self {
        self.failing.lock().unwrap().insert(text.to_owned());
        self
    }

    /// Clears all configured failures.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Every text passed to `synthesize`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for RecordingSpeech {
    async fn synthesize(&self, text: &str) -> Result<String, DomainError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(text.to_owned());
        if self.failing.lock().unwrap().contains(text) {
            return Err(DomainError::Collaborator("speech backend unavailable".into()));
        }
        Ok(format!("/audio/{}.ogg", calls.len()))
    }
}
