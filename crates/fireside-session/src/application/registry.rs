//! Session registry.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use fireside_core::error::DomainError;
use fireside_hub::Hub;
use tokio_util::task::TaskTracker;
use tracing::info;
use uuid::Uuid;

use crate::application::context::SessionContext;
use crate::application::session::Session;

/// Maps session identifiers to live sessions for the life of the process.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
    context: SessionContext,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(context: SessionContext) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            context,
        }
    }

    /// Registers a new session under a fresh identifier.
    pub fn create(&self) -> Arc<Session> {
        self.create_with_id(Uuid::new_v4())
    }

    /// Registers a session under `id`, or returns the one already there.
    pub fn create_with_id(&self, id: Uuid) -> Arc<Session> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(sessions.entry(id).or_insert_with(|| {
            info!(session_id = %id, "session created");
            Arc::new(Session::new(id, self.context.clone()))
        }))
    }

    /// Looks up a session.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::SessionNotFound`] if nothing is registered
    /// under `id`.
    pub fn get(&self, id: Uuid) -> Result<Arc<Session>, DomainError> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(DomainError::SessionNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn hub(&self) -> &Hub {
        &self.context.hub
    }

    /// Tracker for background work tied to sessions.
    #[must_use]
    pub fn tasks(&self) -> &TaskTracker {
        &self.context.tasks
    }

    /// Waits for every tracked operation and audio pass to finish.
    ///
    /// Work spawned while draining is waited for too.
    pub async fn drain(&self) {
        self.context.tasks.close();
        self.context.tasks.wait().await;
        info!("session work drained");
    }
}
