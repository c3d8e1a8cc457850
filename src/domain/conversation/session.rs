//! ConversationSession aggregate.
//!
//! Holds the transcript, the bounded context window, the detected tone and
//! the active wizard. Sessions are values: transitions clone, mutate the
//! clone and hand it back, so a rejected event can never leave a partially
//! updated session behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionId;
use crate::domain::tone::Tone;
use crate::domain::wizard::{WizardKind, WizardState};

use super::context::{ContextEntry, ContextWindow};
use super::effects::{EffectKind, PendingEffect};
use super::message::ConversationMessage;

/// Whether the session can accept input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "waiting_on", rename_all = "snake_case")]
pub enum SessionStatus {
    Ready,
    Busy(EffectKind),
    Closed,
}

/// Host-facing summary of wizard progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardProgress {
    pub kind: WizardKind,
    pub step_key: String,
    pub step_index: usize,
    pub total_steps: usize,
    pub selected: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSession {
    id: SessionId,
    transcript: Vec<ConversationMessage>,
    context: ContextWindow,
    tone: Tone,
    wizard: Option<WizardState>,
    pending: Option<PendingEffect>,
    closed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationSession {
    /// Creates an empty session whose context window holds at most
    /// `context_capacity` entries.
    pub fn new(id: SessionId, context_capacity: usize) -> Self {
        let now = Utc::now();
        Self {
            id,
            transcript: Vec::new(),
            context: ContextWindow::new(context_capacity),
            tone: Tone::default(),
            wizard: None,
            pending: None,
            closed: false,
            created_at: now,
            updated_at: now,
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn transcript(&self) -> &[ConversationMessage] {
        &self.transcript
    }

    pub fn context(&self) -> &ContextWindow {
        &self.context
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn wizard(&self) -> Option<&WizardState> {
        self.wizard.as_ref()
    }

    pub fn pending(&self) -> Option<&PendingEffect> {
        self.pending.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn status(&self) -> SessionStatus {
        if self.closed {
            return SessionStatus::Closed;
        }
        match &self.pending {
            Some(effect) => SessionStatus::Busy(effect.kind()),
            None => SessionStatus::Ready,
        }
    }

    pub fn wizard_progress(&self) -> Option<WizardProgress> {
        let wizard = self.wizard.as_ref()?;
        let step = wizard.current_step()?;
        Some(WizardProgress {
            kind: wizard.kind,
            step_key: step.key.to_string(),
            step_index: wizard.step_index,
            total_steps: wizard.applicable_step_count(),
            selected: wizard.multi_select_buffer.iter().cloned().collect(),
        })
    }

    // ════════════════════════════════════════════════════════════════════
    // Mutators used by transitions
    // ════════════════════════════════════════════════════════════════════

    /// Appends to the transcript, and to the context window when the message
    /// has content. Empty action-only or attachment-only messages stay out of
    /// the window.
    pub(super) fn append(&mut self, message: ConversationMessage) {
        if message.has_content() {
            self.context.push(ContextEntry::from(&message));
        }
        self.transcript.push(message);
        self.touch();
    }

    pub(super) fn set_tone(&mut self, tone: Tone) {
        self.tone = tone;
    }

    pub(super) fn set_wizard(&mut self, wizard: Option<WizardState>) {
        self.wizard = wizard;
        self.touch();
    }

    pub(super) fn set_pending(&mut self, effect: Option<PendingEffect>) {
        self.pending = effect;
        self.touch();
    }

    /// Ends the session. Transcript, context and wizard are dropped; only
    /// the closed marker remains.
    pub fn close(&mut self) {
        self.closed = true;
        self.transcript.clear();
        self.context = ContextWindow::new(self.context.capacity());
        self.wizard = None;
        self.pending = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
