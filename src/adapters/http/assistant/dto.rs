//! HTTP DTOs for assistant endpoints.
//!
//! Messages, events and host operations already have a stable wire form in
//! the domain and are embedded as-is. The envelopes here are HTTP-only.

use serde::{Deserialize, Serialize};

use crate::application::{ActionOutcome, EventOutcome};
use crate::domain::actions::{ActionToken, HostOperation};
use crate::domain::conversation::{
    ConversationMessage, ConversationSession, SessionEvent, SessionStatus, WizardProgress,
};
use crate::domain::foundation::DomainError;
use crate::domain::routing::UserContext;
use crate::domain::tone::Tone;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /assistant/sessions/:id/events`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRequest {
    pub event: SessionEvent,
    #[serde(default)]
    pub context: UserContext,
}

/// Body of `POST /assistant/sessions/:id/actions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionRequest {
    pub action: ActionToken,
    #[serde(default)]
    pub context: UserContext,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Messages and state after an operation.
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub session_id: String,
    pub messages: Vec<ConversationMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub status: SessionStatus,
    pub tone: Tone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wizard: Option<WizardProgress>,
}

impl From<EventOutcome> for EventResponse {
    fn from(outcome: EventOutcome) -> Self {
        Self {
            session_id: outcome.session_id.to_string(),
            messages: outcome.emitted,
            warning: outcome.warning,
            status: outcome.status,
            tone: outcome.tone,
            wizard: outcome.wizard,
        }
    }
}

/// Host operation plus whatever the conversation produced.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    pub operation: HostOperation,
    #[serde(flatten)]
    pub conversation: EventResponse,
}

impl From<ActionOutcome> for ActionResponse {
    fn from(outcome: ActionOutcome) -> Self {
        Self {
            operation: outcome.operation,
            conversation: outcome.conversation.into(),
        }
    }
}

/// Full session view.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub status: SessionStatus,
    pub tone: Tone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wizard: Option<WizardProgress>,
    pub transcript: Vec<ConversationMessage>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ConversationSession> for SessionResponse {
    fn from(session: &ConversationSession) -> Self {
        Self {
            session_id: session.id().to_string(),
            status: session.status(),
            tone: session.tone(),
            wizard: session.wizard_progress(),
            transcript: session.transcript().to_vec(),
            created_at: session.created_at().to_rfc3339(),
            updated_at: session.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sessions: usize,
    pub assistant: String,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<DomainError> for ErrorResponse {
    fn from(err: DomainError) -> Self {
        let details = if err.details.is_empty() {
            None
        } else {
            serde_json::to_value(&err.details).ok()
        };
        Self {
            code: err.code.to_string(),
            message: err.message,
            details,
        }
    }
}
