//! Speech collaborator seam.

use async_trait::async_trait;

use crate::error::DomainError;

/// External service converting narration text into playable audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` and return a reference (URL path) to the audio.
    async fn synthesize(&self, text: &str) -> Result<String, DomainError>;
}
