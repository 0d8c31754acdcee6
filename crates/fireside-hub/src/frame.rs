//! Server-to-client frames.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One notification for viewers of a session.
///
/// Serialized as `{"method": "full_overwrite" | "set" | "push", ...}`.
/// Paths are dotted field paths into the session document, e.g.
/// `players.<id>` or `ai.chat_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Frame {
    /// Replace the whole session document.
    FullOverwrite {
        /// The entire session.
        value: Value,
    },
    /// Replace the field at `path`.
    Set {
        /// Dotted field path.
        path: String,
        /// New value.
        value: Value,
    },
    /// Append to the sequence at `path`.
    Push {
        /// Dotted field path of a sequence.
        path: String,
        /// Appended element.
        value: Value,
    },
}

impl Frame {
    /// Builds a `full_overwrite` frame.
    #[must_use]
    pub fn full_overwrite(value: Value) -> Self {
        Self::FullOverwrite { value }
    }

    /// Builds a `set` frame.
    #[must_use]
    pub fn set(path: impl Into<String>, value: Value) -> Self {
        Self::Set {
            path: path.into(),
            value,
        }
    }

    /// Builds a `push` frame.
    #[must_use]
    pub fn push(path: impl Into<String>, value: Value) -> Self {
        Self::Push {
            path: path.into(),
            value,
        }
    }

    /// The frame's method name as it appears on the wire.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::FullOverwrite { .. } => "full_overwrite",
            Self::Set { .. } => "set",
            Self::Push { .. } => "push",
        }
    }

    /// Serializes the frame once so it can be shared between subscribers.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if a value cannot be encoded.
    pub fn encode(&self) -> Result<Arc<str>, serde_json::Error> {
        serde_json::to_string(self).map(Arc::from)
    }
}
