//! Remote Assistant Port - request/response contract with the language model.
//!
//! The session never talks to the model directly. It produces an
//! [`AssistantRequest`] carrying the bounded context window, and an adapter
//! turns that into a provider call.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct Canned;
//!
//! #[async_trait]
//! impl RemoteAssistant for Canned {
//!     async fn chat(&self, _request: AssistantRequest) -> Result<AssistantReply, AssistantError> {
//!         Ok(AssistantReply::text("Hello!"))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "canned"
//!     }
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::{AssistantReply, AssistantRequest};

/// Port for the external conversational model.
#[async_trait]
pub trait RemoteAssistant: Send + Sync {
    /// Answers one free-text message given the session context.
    async fn chat(&self, request: AssistantRequest) -> Result<AssistantReply, AssistantError>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Remote assistant failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssistantError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key missing or rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl AssistantError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AssistantError::RateLimited { .. }
                | AssistantError::Unavailable { .. }
                | AssistantError::Network(_)
                | AssistantError::Timeout { .. }
        )
    }
}
