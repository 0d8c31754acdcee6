//! Collaborators shared by every session.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use fireside_core::clock::Clock;
use fireside_core::narrator::Narrator;
use fireside_core::speech::SpeechSynthesizer;
use fireside_dice::KarmicDice;
use fireside_hub::Hub;
use tokio_util::task::TaskTracker;

/// Fallback for `collaborator_timeout`.
pub const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(120);

/// Everything a session needs from the outside world.
///
/// Cloning is cheap; all sessions of a registry share one context, and with
/// it one karmic weight and one task tracker.
#[derive(Clone)]
pub struct SessionContext {
    pub hub: Hub,
    pub narrator: Arc<dyn Narrator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub dice: Arc<KarmicDice>,
    pub clock: Arc<dyn Clock>,
    /// Background work spawned by sessions; drained on shutdown.
    pub tasks: TaskTracker,
    /// Upper bound for a single narrator or speech call.
    pub collaborator_timeout: Duration,
}

impl SessionContext {
    #[must_use]
    pub fn new(
        hub: Hub,
        narrator: Arc<dyn Narrator>,
        speech: Arc<dyn SpeechSynthesizer>,
        dice: Arc<KarmicDice>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            hub,
            narrator,
            speech,
            dice,
            clock,
            tasks: TaskTracker::new(),
            collaborator_timeout: DEFAULT_COLLABORATOR_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_collaborator_timeout(mut self, timeout: Duration) -> Self {
        self.collaborator_timeout = timeout;
        self
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("dice", &self.dice)
            .field("tasks", &self.tasks)
            .field("collaborator_timeout", &self.collaborator_timeout)
            .finish_non_exhaustive()
    }
}
