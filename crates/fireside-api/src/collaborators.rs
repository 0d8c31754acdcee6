//! HTTP clients for the narrator and speech services.

use std::path::PathBuf;

use async_trait::async_trait;
use fireside_core::error::DomainError;
use fireside_core::narrator::{NarrationRequest, Narrator, NarratorResponse};
use fireside_core::speech::SpeechSynthesizer;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};
use uuid::Uuid;

fn collaborator(error: reqwest::Error) -> DomainError {
    DomainError::Collaborator(error.to_string())
}

/// Posts narration requests as JSON and decodes the structured reply.
#[derive(Debug, Clone)]
pub struct HttpNarrator {
    client: Client,
    url: String,
}

impl HttpNarrator {
    #[must_use]
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Narrator for HttpNarrator {
    #[instrument(skip(self, request), fields(session_id = %request.session_id))]
    async fn narrate(&self, request: NarrationRequest) -> Result<NarratorResponse, DomainError> {
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(collaborator)?
            .error_for_status()
            .map_err(collaborator)?;
        response.json().await.map_err(collaborator)
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
}

/// Posts text to the speech service and stores the returned audio under
/// `audio_dir`, answering with its public path `/audio/<name>.ogg`.
#[derive(Debug, Clone)]
pub struct HttpSpeech {
    client: Client,
    url: String,
    audio_dir: PathBuf,
}

impl HttpSpeech {
    #[must_use]
    pub fn new(client: Client, url: impl Into<String>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            url: url.into(),
            audio_dir: audio_dir.into(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeech {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<String, DomainError> {
        let audio = self
            .client
            .post(&self.url)
            .json(&SpeechRequest { text })
            .send()
            .await
            .map_err(collaborator)?
            .error_for_status()
            .map_err(collaborator)?
            .bytes()
            .await
            .map_err(collaborator)?;

        let name = format!("{}.ogg", Uuid::new_v4());
        tokio::fs::write(self.audio_dir.join(&name), &audio)
            .await
            .map_err(|e| DomainError::Collaborator(format!("storing audio failed: {e}")))?;
        debug!(bytes = audio.len(), %name, "audio stored");
        Ok(format!("/audio/{name}"))
    }
}
