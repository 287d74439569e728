//! Session store port.
//!
//! Creation, lookup and mutation only; no business logic. The store owns the
//! sessions, the orchestrator owns all writes.

use async_trait::async_trait;

use crate::domain::conversation::Session;
use crate::domain::foundation::SessionId;

/// Port for the durable session registry.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a fresh session in the `Greeting` state and stores it.
    async fn create_session(&self) -> Result<Session, SessionStoreError>;

    /// Looks up a session by id.
    async fn get(&self, session_id: SessionId) -> Result<Option<Session>, SessionStoreError>;

    /// Persists a mutated session.
    async fn save(&self, session: Session) -> Result<(), SessionStoreError>;
}

/// Session store errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    /// The backing store failed.
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    /// The session could not be serialized.
    #[error("session unserializable: {0}")]
    Serialization(String),
}

impl SessionStoreError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
