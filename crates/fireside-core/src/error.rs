//! Domain error types.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No session is registered under the identifier.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// A scenario identifier did not resolve to a bundled scenario.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    /// An external collaborator (narration or speech) failed.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// An external collaborator did not answer in time.
    #[error("{collaborator} timed out after {after:?}")]
    Timeout {
        /// Which collaborator stalled.
        collaborator: &'static str,
        /// The configured deadline.
        after: Duration,
    },
}
