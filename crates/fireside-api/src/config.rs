//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use uuid::Uuid;

use crate::error::AppError;

/// Session pre-provisioned at startup so a running demo can be deep-linked.
pub const DEMO_SESSION_ID: &str = "28603f7e-77c7-487b-8d06-548354c35178";

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Endpoint of the narrative collaborator.
    pub narrator_url: String,
    /// Endpoint of the speech collaborator.
    pub speech_url: String,
    /// Where synthesized audio is written; served under `/audio`.
    pub audio_dir: PathBuf,
    pub collaborator_timeout: Duration,
    pub demo_session_id: Uuid,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| AppError::Config(format!("{key} environment variable must be set")))
        };

        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let timeout_secs: u64 = lookup("COLLABORATOR_TIMEOUT_SECS")
            .unwrap_or_else(|| "120".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("COLLABORATOR_TIMEOUT_SECS must be seconds: {e}")))?;
        let demo_session_id = lookup("DEMO_SESSION_ID")
            .unwrap_or_else(|| DEMO_SESSION_ID.to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("DEMO_SESSION_ID must be a UUID: {e}")))?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            narrator_url: required("NARRATOR_URL")?,
            speech_url: required("SPEECH_URL")?,
            audio_dir: lookup("AUDIO_DIR").map_or_else(|| PathBuf::from("./audio"), PathBuf::from),
            collaborator_timeout: Duration::from_secs(timeout_secs),
            demo_session_id,
        })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
