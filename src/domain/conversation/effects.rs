//! Asynchronous work requested by a transition, and its results.
//!
//! Transitions never perform I/O. When one needs a remote call it returns a
//! [`PendingEffect`]; the caller performs it and feeds the matching
//! [`EffectOutcome`] back into the session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::actions::ActionToken;
use crate::domain::marketplace::{CreatedGig, FreelancerProfile, GigSummary};
use crate::domain::tone::Tone;
use crate::domain::wizard::{FreelancerDraft, GigDraft, GigSearchQuery};

use super::context::ContextEntry;

/// Context forwarded to the remote assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<String>,
    pub tone: Tone,
    pub is_authenticated: bool,
    pub is_freelancer: bool,
    pub history: Vec<ContextEntry>,
}

/// Free-text question for the remote assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantRequest {
    pub message: String,
    pub context: AssistantContext,
}

/// Remote assistant answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionToken>,
}

impl AssistantReply {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            action: None,
        }
    }

    pub fn with_action(mut self, action: ActionToken) -> Self {
        self.action = Some(action);
        self
    }
}

/// Discriminant shared by effects and outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    AskAssistant,
    CreateGig,
    RegisterFreelancer,
    SearchGigs,
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EffectKind::AskAssistant => "ask_assistant",
            EffectKind::CreateGig => "create_gig",
            EffectKind::RegisterFreelancer => "register_freelancer",
            EffectKind::SearchGigs => "search_gigs",
        };
        write!(f, "{}", s)
    }
}

/// A remote call the session is waiting on.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingEffect {
    AskAssistant(AssistantRequest),
    CreateGig(GigDraft),
    RegisterFreelancer(FreelancerDraft),
    SearchGigs(GigSearchQuery),
}

impl PendingEffect {
    pub fn kind(&self) -> EffectKind {
        match self {
            PendingEffect::AskAssistant(_) => EffectKind::AskAssistant,
            PendingEffect::CreateGig(_) => EffectKind::CreateGig,
            PendingEffect::RegisterFreelancer(_) => EffectKind::RegisterFreelancer,
            PendingEffect::SearchGigs(_) => EffectKind::SearchGigs,
        }
    }
}

/// Result of performing a [`PendingEffect`]. Failures carry a user-facing
/// detail string.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectOutcome {
    Assistant(Result<AssistantReply, String>),
    GigCreated(Result<CreatedGig, String>),
    FreelancerRegistered(Result<Option<FreelancerProfile>, String>),
    GigsFound(Result<Vec<GigSummary>, String>),
}

impl EffectOutcome {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectOutcome::Assistant(_) => EffectKind::AskAssistant,
            EffectOutcome::GigCreated(_) => EffectKind::CreateGig,
            EffectOutcome::FreelancerRegistered(_) => EffectKind::RegisterFreelancer,
            EffectOutcome::GigsFound(_) => EffectKind::SearchGigs,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            EffectOutcome::Assistant(r) => r.is_ok(),
            EffectOutcome::GigCreated(r) => r.is_ok(),
            EffectOutcome::FreelancerRegistered(r) => r.is_ok(),
            EffectOutcome::GigsFound(r) => r.is_ok(),
        }
    }
}
