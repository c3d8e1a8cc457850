//! Conversation domain module.
//!
//! The session aggregate and the pure transitions that drive it: free-text
//! chat interleaved with guided wizards, tone-adapted replies, a bounded
//! context window for the remote assistant and structured actions for the
//! host.

mod context;
mod effects;
mod engine;
mod errors;
mod message;
mod session;

pub use context::{ContextEntry, ContextWindow, MAX_CONTEXT_ENTRIES};
pub use effects::{
    AssistantContext, AssistantReply, AssistantRequest, EffectKind, EffectOutcome, PendingEffect,
};
pub use engine::{
    ConversationEngine, DispatchResult, EngineConfig, SessionEvent, Transition,
    CANCELLED_MESSAGE, FALLBACK_MESSAGE, GIG_POSTED_MESSAGE, GREETING_MESSAGE, NO_GIGS_MESSAGE,
    REGISTERED_MESSAGE,
};
pub use errors::SessionError;
pub use message::{ConversationMessage, Role};
pub use session::{ConversationSession, SessionStatus, WizardProgress};
