//! Session Store Port - where open assistant sessions live.
//!
//! Sessions are ephemeral. A store holds them while they are open and keeps
//! a closed marker until the session goes idle; nothing survives a restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::SessionId;

/// Errors that can occur during session storage operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Port for holding open sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session, `None` if unknown or already removed
    async fn load(&self, id: SessionId) -> Result<Option<ConversationSession>, SessionStoreError>;

    /// Insert or replace a session
    async fn save(&self, session: &ConversationSession) -> Result<(), SessionStoreError>;

    /// Number of sessions currently held, closed ones included
    async fn len(&self) -> Result<usize, SessionStoreError>;

    /// Drop every session, open or closed, last touched before `cutoff`.
    /// Returns how many were removed.
    async fn remove_idle(&self, cutoff: DateTime<Utc>) -> Result<usize, SessionStoreError>;
}
