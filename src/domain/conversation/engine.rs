//! Conversation Engine - pure session transitions.
//!
//! `(session, event) -> Transition`. The engine decides between wizard
//! continuation, quick actions and delegation to the remote assistant. It
//! never performs I/O: remote work is returned as a [`PendingEffect`] and its
//! result is folded back in with [`ConversationEngine::resolve`].

use serde::{Deserialize, Serialize};

use crate::domain::actions::{ActionDispatcher, ActionToken, HostOperation};
use crate::domain::foundation::SessionId;
use crate::domain::routing::{IntentRouter, QuickAction, RouteDecision, UserContext};
use crate::domain::tone::{adapt, ToneDetector};
use crate::domain::wizard::{
    InputType, StepDefinition, StepOutcome, WizardEngine, WizardPayload, WizardState,
};

use super::context::MAX_CONTEXT_ENTRIES;
use super::effects::{AssistantContext, AssistantRequest, EffectOutcome, PendingEffect};
use super::errors::SessionError;
use super::message::ConversationMessage;
use super::session::ConversationSession;

pub const GREETING_MESSAGE: &str = "Hey! I'm your Career Plus assistant. I can help you find gigs, post a gig or set up your freelancer profile. What would you like to do?";

pub const FALLBACK_MESSAGE: &str =
    "Oops, I'm having trouble connecting right now. Please try again in a moment!";

pub const CANCELLED_MESSAGE: &str = "No worries! I've cancelled that. What else can I help with?";

pub const GIG_POSTED_MESSAGE: &str =
    "Awesome! Your gig is live. Freelancers can start applying right away.";

pub const REGISTERED_MESSAGE: &str =
    "Perfect! You're now registered as a freelancer. Let's find you some matching gigs.";

pub const NO_GIGS_MESSAGE: &str =
    "Sorry, no gigs match that search right now. Try a broader category or location.";

/// Input from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Typed text: a wizard answer, or free text when no wizard is active.
    Message { text: String },
    QuickAction { action: QuickAction },
    /// Add or remove an option on a multi-select step.
    ToggleOption { option: String },
    /// The "done" button of a multi-select step.
    ConfirmSelection,
    Cancel,
}

/// New session state plus everything the host needs to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub session: ConversationSession,
    pub emitted: Vec<ConversationMessage>,
    /// Local validation warning. Set only when the session is unchanged.
    pub warning: Option<String>,
    /// Remote work the caller must perform and then resolve.
    pub effect: Option<PendingEffect>,
}

impl Transition {
    fn rejected(session: &ConversationSession, warning: impl Into<String>) -> Self {
        Self {
            session: session.clone(),
            emitted: Vec::new(),
            warning: Some(warning.into()),
            effect: None,
        }
    }
}

/// Result of resolving an action token.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    pub operation: HostOperation,
    /// Present when the operation re-entered the conversation.
    pub transition: Option<Transition>,
}

/// Tunables for the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub context_window: usize,
    pub numeric_fallback: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            context_window: MAX_CONTEXT_ENTRIES,
            numeric_fallback: 1.0,
        }
    }
}

/// Accumulates changes to a cloned session.
struct Draft {
    session: ConversationSession,
    emitted: Vec<ConversationMessage>,
    effect: Option<PendingEffect>,
}

impl Draft {
    fn new(session: &ConversationSession) -> Self {
        Self {
            session: session.clone(),
            emitted: Vec::new(),
            effect: None,
        }
    }

    fn user(&mut self, text: impl Into<String>) {
        self.session.append(ConversationMessage::user(text));
    }

    /// Tone-adapts and appends an assistant message.
    fn emit(&mut self, mut message: ConversationMessage) {
        message.content = adapt(&message.content, self.session.tone());
        self.session.append(message.clone());
        self.emitted.push(message);
    }

    fn say(&mut self, template: &str) {
        self.emit(ConversationMessage::assistant(template));
    }

    fn prompt(&mut self, step: &StepDefinition) {
        self.emit(ConversationMessage::assistant(step.prompt).with_input(step.input_spec()));
    }

    fn await_effect(&mut self, effect: PendingEffect) {
        self.session.set_pending(Some(effect.clone()));
        self.effect = Some(effect);
    }

    fn finish(self) -> Transition {
        Transition {
            session: self.session,
            emitted: self.emitted,
            warning: None,
            effect: self.effect,
        }
    }
}

/// Stateless transition functions over [`ConversationSession`].
#[derive(Debug, Clone, Copy)]
pub struct ConversationEngine {
    detector: ToneDetector,
    router: IntentRouter,
    wizards: WizardEngine,
    dispatcher: ActionDispatcher,
    context_window: usize,
}

impl Default for ConversationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ConversationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            detector: ToneDetector,
            router: IntentRouter,
            wizards: WizardEngine::new(config.numeric_fallback),
            dispatcher: ActionDispatcher,
            context_window: config.context_window,
        }
    }

    /// A new session, greeted.
    pub fn open_session(&self, id: SessionId) -> Transition {
        let session = ConversationSession::new(id, self.context_window);
        let mut draft = Draft::new(&session);
        draft.say(GREETING_MESSAGE);
        draft.finish()
    }

    /// Applies one host event.
    pub fn apply(
        &self,
        session: &ConversationSession,
        event: SessionEvent,
        ctx: &UserContext,
    ) -> Result<Transition, SessionError> {
        ensure_accepting(session)?;

        let transition = match event {
            SessionEvent::Message { text } => self.on_message(session, &text, ctx),
            SessionEvent::QuickAction { action } => self.on_quick_action(session, action, ctx),
            SessionEvent::ToggleOption { option } => self.on_toggle(session, &option),
            SessionEvent::ConfirmSelection => self.on_confirm(session),
            SessionEvent::Cancel => self.on_cancel(session),
        };
        Ok(transition)
    }

    /// Folds the result of the pending effect back into the session.
    pub fn resolve(
        &self,
        session: &ConversationSession,
        outcome: EffectOutcome,
    ) -> Result<Transition, SessionError> {
        if session.is_closed() {
            return Err(SessionError::Closed);
        }
        let pending = session.pending().ok_or(SessionError::NotAwaiting)?;
        if pending.kind() != outcome.kind() {
            return Err(SessionError::UnexpectedResolution {
                expected: pending.kind(),
                actual: outcome.kind(),
            });
        }
        let search = match pending {
            PendingEffect::SearchGigs(query) => Some(query.clone()),
            _ => None,
        };

        let mut draft = Draft::new(session);
        draft.session.set_pending(None);

        match outcome {
            EffectOutcome::Assistant(Ok(reply)) => draft.emit(
                ConversationMessage::assistant(reply.response).with_optional_action(reply.action),
            ),
            EffectOutcome::Assistant(Err(_)) => draft.say(FALLBACK_MESSAGE),
            EffectOutcome::GigCreated(Ok(gig)) => draft.emit(
                ConversationMessage::assistant(GIG_POSTED_MESSAGE)
                    .with_action(ActionToken::view_gig(&gig.id)),
            ),
            EffectOutcome::GigCreated(Err(detail)) => draft.say(&format!(
                "Oops, I couldn't post your gig: {}. Start the post gig flow again whenever you're ready.",
                detail
            )),
            EffectOutcome::FreelancerRegistered(Ok(_)) => draft.emit(
                ConversationMessage::assistant(REGISTERED_MESSAGE)
                    .with_action(ActionToken::find_matching_gigs()),
            ),
            EffectOutcome::FreelancerRegistered(Err(detail)) => draft.say(&format!(
                "Oops, I couldn't register you as a freelancer: {}. Give it another try in a moment.",
                detail
            )),
            EffectOutcome::GigsFound(Ok(gigs)) => {
                let action = ActionToken::search_gigs(&search.unwrap_or_default());
                let message = if gigs.is_empty() {
                    ConversationMessage::assistant(NO_GIGS_MESSAGE)
                } else {
                    let noun = if gigs.len() == 1 { "gig" } else { "gigs" };
                    ConversationMessage::assistant(format!(
                        "Great! I found {} {} for you.",
                        gigs.len(),
                        noun
                    ))
                    .with_attachments(gigs)
                };
                draft.emit(message.with_action(action));
            }
            EffectOutcome::GigsFound(Err(detail)) => draft.say(&format!(
                "Oops, I couldn't search gigs right now: {}. Please try again in a moment!",
                detail
            )),
        }

        Ok(draft.finish())
    }

    /// Resolves an action token. Operations that re-enter the conversation
    /// are applied to the session; navigation is handed back to the host.
    pub fn dispatch(
        &self,
        session: &ConversationSession,
        token: &ActionToken,
        ctx: &UserContext,
    ) -> Result<DispatchResult, SessionError> {
        let operation = self.dispatcher.dispatch(token);

        let transition = match &operation {
            HostOperation::RunQuickAction { action } => Some(self.apply(
                session,
                SessionEvent::QuickAction { action: *action },
                ctx,
            )?),
            _ => None,
        };

        Ok(DispatchResult {
            operation,
            transition,
        })
    }

    // ════════════════════════════════════════════════════════════════════
    // Event handlers
    // ════════════════════════════════════════════════════════════════════

    fn on_message(
        &self,
        session: &ConversationSession,
        text: &str,
        ctx: &UserContext,
    ) -> Transition {
        let Some(active) = session.wizard() else {
            return self.on_free_text(session, text, ctx);
        };

        let mut wizard = active.clone();
        let Some(step) = wizard.current_step() else {
            return Transition::rejected(session, "That flow is already finished.");
        };
        let outcome = match self.wizards.submit(&mut wizard, text) {
            Ok(outcome) => outcome,
            Err(err) => return Transition::rejected(session, err.to_string()),
        };

        let mut draft = Draft::new(session);
        if matches!(step.input_type, InputType::Text | InputType::Textarea) {
            draft.session.set_tone(self.detector.detect(text));
        }
        let shown = text.trim();
        draft.user(if shown.is_empty() { "Skip" } else { shown });
        self.advance(&mut draft, wizard, outcome);
        draft.finish()
    }

    fn on_free_text(
        &self,
        session: &ConversationSession,
        text: &str,
        ctx: &UserContext,
    ) -> Transition {
        let text = text.trim();
        if text.is_empty() {
            return Transition::rejected(session, "Type a message to get started.");
        }

        let mut draft = Draft::new(session);
        draft.session.set_tone(self.detector.detect(text));

        match self.router.route_text(text, ctx) {
            RouteDecision::Delegate => {
                // History excludes the message being asked about.
                let request = assistant_request(&draft.session, text, ctx);
                draft.user(text);
                draft.await_effect(PendingEffect::AskAssistant(request));
            }
            decision => {
                draft.user(text);
                self.apply_decision(&mut draft, decision);
            }
        }
        draft.finish()
    }

    fn on_quick_action(
        &self,
        session: &ConversationSession,
        action: QuickAction,
        ctx: &UserContext,
    ) -> Transition {
        if let Some(active) = session.wizard() {
            return Transition::rejected(session, busy_wizard_warning(active));
        }

        let mut draft = Draft::new(session);
        draft.user(action.label());
        self.apply_decision(&mut draft, self.router.route_quick_action(action, ctx));
        draft.finish()
    }

    fn on_toggle(&self, session: &ConversationSession, option: &str) -> Transition {
        let Some(active) = session.wizard() else {
            return Transition::rejected(session, "There's nothing to select right now.");
        };

        let mut wizard = active.clone();
        match self.wizards.toggle(&mut wizard, option) {
            Ok(outcome) => {
                let mut draft = Draft::new(session);
                self.advance(&mut draft, wizard, outcome);
                draft.finish()
            }
            Err(err) => Transition::rejected(session, err.to_string()),
        }
    }

    fn on_confirm(&self, session: &ConversationSession) -> Transition {
        let Some(active) = session.wizard() else {
            return Transition::rejected(session, "There's nothing to confirm right now.");
        };
        let Some(step) = active.current_step() else {
            return Transition::rejected(session, "That flow is already finished.");
        };

        let mut wizard = active.clone();
        let outcome = match self.wizards.commit_selection(&mut wizard) {
            Ok(outcome) => outcome,
            Err(err) => return Transition::rejected(session, err.to_string()),
        };

        let chosen = wizard
            .collected
            .get(step.key)
            .and_then(|v| v.as_list())
            .map(|items| items.join(", "))
            .unwrap_or_default();

        let mut draft = Draft::new(session);
        draft.user(chosen);
        self.advance(&mut draft, wizard, outcome);
        draft.finish()
    }

    fn on_cancel(&self, session: &ConversationSession) -> Transition {
        if session.wizard().is_none() {
            return Transition::rejected(session, "There's nothing to cancel.");
        }

        let mut draft = Draft::new(session);
        draft.user("Cancel");
        draft.session.set_wizard(None);
        draft.say(CANCELLED_MESSAGE);
        draft.finish()
    }

    // ════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════

    fn advance(&self, draft: &mut Draft, wizard: WizardState, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Prompt(step) => {
                draft.session.set_wizard(Some(wizard));
                draft.prompt(step);
            }
            StepOutcome::Toggled { .. } => draft.session.set_wizard(Some(wizard)),
            StepOutcome::Complete(payload) => {
                // The wizard ends here whatever the remote call returns.
                draft.session.set_wizard(None);
                draft.await_effect(match payload {
                    WizardPayload::CreateGig(gig) => PendingEffect::CreateGig(gig),
                    WizardPayload::RegisterFreelancer(profile) => {
                        PendingEffect::RegisterFreelancer(profile)
                    }
                    WizardPayload::SearchGigs(query) => PendingEffect::SearchGigs(query),
                });
            }
        }
    }

    /// Applies a routing decision. `Delegate` is handled by the caller.
    fn apply_decision(&self, draft: &mut Draft, decision: RouteDecision) {
        match decision {
            RouteDecision::StartWizard(kind) => {
                let (state, first) = self.wizards.start(kind);
                draft.session.set_wizard(Some(state));
                draft.prompt(first);
            }
            RouteDecision::Gated {
                message,
                suggestion,
            } => draft.emit(ConversationMessage::assistant(message).with_action(suggestion)),
            RouteDecision::Reply(message) => draft.say(message),
            RouteDecision::Delegate => {}
        }
    }
}

fn ensure_accepting(session: &ConversationSession) -> Result<(), SessionError> {
    if session.is_closed() {
        return Err(SessionError::Closed);
    }
    if let Some(effect) = session.pending() {
        return Err(SessionError::Busy(effect.kind()));
    }
    Ok(())
}

fn busy_wizard_warning(active: &WizardState) -> String {
    format!(
        "Finish or cancel the current {} flow first.",
        active.kind.as_str().replace('_', " ")
    )
}

fn assistant_request(
    session: &ConversationSession,
    text: &str,
    ctx: &UserContext,
) -> AssistantRequest {
    AssistantRequest {
        message: text.to_string(),
        context: AssistantContext {
            current_page: ctx.current_page.clone(),
            tone: session.tone(),
            is_authenticated: ctx.is_authenticated,
            is_freelancer: ctx.is_freelancer,
            history: session.context().to_vec(),
        },
    }
}
