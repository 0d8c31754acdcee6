//! Shared application state.

use std::sync::Arc;

use fireside_session::SessionRegistry;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Every live session.
    pub registry: Arc<SessionRegistry>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }
}
