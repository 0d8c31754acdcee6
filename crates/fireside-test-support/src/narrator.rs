//! Test narrators: scripted `Narrator` implementations for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use fireside_core::error::DomainError;
use fireside_core::narrator::{NarrationRequest, Narrator, NarratorResponse};

/// Builds a response that only carries narrator text.
#[must_use]
pub fn narration(text: &str) -> NarratorResponse {
    NarratorResponse {
        narrator_text: text.to_owned(),
        ..NarratorResponse::default()
    }
}

#[derive(Debug)]
enum Step {
    Reply(NarratorResponse),
    Fail(String),
    Hang,
}

/// A narrator that answers from a queue of scripted steps and records every
/// request it receives. Once the queue is empty it answers with
/// `"narration <n>"`, where `n` counts calls from 1.
#[derive(Debug, Default)]
pub struct ScriptedNarrator {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<NarrationRequest>>,
    delay: Option<Duration>,
}

impl ScriptedNarrator {
    /// Creates a narrator with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a narrator that sleeps for `delay` before every answer.
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Queues a successful response.
    #[must_use]
    pub fn reply(self, response: NarratorResponse) -> Self {
        self.steps.lock().unwrap().push_back(Step::Reply(response));
        self
    }

    /// Queues a collaborator failure.
    #[must_use]
    pub fn fail(self, message: &str) -> Self {
        self.steps
            .lock()
            .unwrap()
            .push_back(Step::Fail(message.to_owned()));
        self
    }

    /// Queues a call that never completes.
    #[must_use]
    pub fn hang(self) -> Self {
        self.steps.lock().unwrap().push_back(Step::Hang);
        self
    }

    /// Returns a snapshot of every request received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<NarrationRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Narrator for ScriptedNarrator {
    async fn narrate(&self, request: NarrationRequest) -> Result<NarratorResponse, DomainError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(response)) => Ok(response),
            Some(Step::Fail(message)) => Err(DomainError::Collaborator(message)),
            Some(Step::Hang) => std::future::pending().await,
            None => Ok(narration(&format!("narration {call}"))),
        }
    }
}
