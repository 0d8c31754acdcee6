//! Audio enrichment pass.

use fireside_core::error::DomainError;
use fireside_hub::Frame;
use fireside_narrative::chronicle::audio_path;
use serde_json::json;
use tracing::{instrument, warn};

use crate::application::session::Session;

impl Session {
    /// Synthesizes audio for every narrator message still missing it and
    /// publishes each filled slot. Returns how many slots were filled.
    ///
    /// Runs under the session lock, so it never overlaps another operation.
    /// Messages that already carry audio are skipped, and a failed
    /// synthesis leaves its message for the next pass.
    #[instrument(skip(self), fields(session_id = %self.id()))]
    pub async fn fill_missing_audio(&self) -> usize {
        let mut state = self.lock().await;
        let context = self.context();
        let limit = context.collaborator_timeout;
        let mut filled = 0;

        for index in state.ai.missing_audio() {
            let text = state.ai.chat_history[index].message().to_owned();
            let outcome = tokio::time::timeout(limit, context.speech.synthesize(&text))
                .await
                .unwrap_or(Err(DomainError::Timeout {
                    collaborator: "speech",
                    after: limit,
                }));
            match outcome {
                Ok(reference) => {
                    if state.ai.chat_history[index].attach_audio(reference.clone()) {
                        self.publish(Frame::set(audio_path(index), json!(reference)));
                        filled += 1;
                    }
                }
                Err(error) => warn!(%error, index, "speech synthesis failed"),
            }
        }
        filled
    }
}
