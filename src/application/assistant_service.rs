//! AssistantService - hosts conversation sessions for the HTTP layer.
//!
//! Each request runs in two short critical sections around the session
//! store. The first loads the session, applies the pure transition and saves
//! it, marking it busy when remote work is pending. The remote call then runs
//! without holding the lock, under the configured timeout and retry policy.
//! The second section reloads the session and folds the result back in. A
//! session closed while the call was in flight keeps its closed state and
//! the result is dropped.
//!
//! The remote call and the second section run on a spawned task, so a
//! request that is cancelled mid-flight still settles its session.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use secrecy::ExposeSecret;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::adapters::resilience::{with_timeout_and_retry, RetryPolicy};
use crate::domain::actions::{ActionToken, HostOperation};
use crate::domain::conversation::{
    ConversationEngine, ConversationMessage, ConversationSession, EffectKind, EffectOutcome,
    EngineConfig, PendingEffect, SessionError, SessionEvent, SessionStatus, Transition,
    WizardProgress,
};
use crate::domain::foundation::SessionId;
use crate::domain::routing::UserContext;
use crate::domain::tone::Tone;
use crate::ports::{
    FreelancerService, GigService, RemoteAssistant, SessionStore, SessionStoreError,
};

/// Errors surfaced to the HTTP layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssistantServiceError {
    #[error("Session {0} not found")]
    NotFound(SessionId),

    #[error("Session is waiting on {0}")]
    Busy(EffectKind),

    #[error("Session is closed")]
    Closed,

    #[error(transparent)]
    Storage(#[from] SessionStoreError),

    /// A resolution arrived that the session was not waiting for.
    #[error("Session out of sync: {0}")]
    OutOfSync(SessionError),

    #[error("Effect task failed: {0}")]
    TaskFailed(String),
}

impl From<SessionError> for AssistantServiceError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Busy(kind) => Self::Busy(kind),
            SessionError::Closed => Self::Closed,
            other => Self::OutOfSync(other),
        }
    }
}

/// Tunables for the service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssistantServiceConfig {
    pub engine: EngineConfig,
    pub assistant_policy: RetryPolicy,
    pub marketplace_policy: RetryPolicy,
    /// Maximum gigs returned by a wizard search.
    pub search_limit: usize,
    /// Idle time after which a session, open or closed, is forgotten.
    pub session_ttl: Duration,
}

impl Default for AssistantServiceConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            assistant_policy: RetryPolicy::default(),
            marketplace_policy: RetryPolicy::default(),
            search_limit: 5,
            session_ttl: Duration::from_secs(30 * 60),
        }
    }
}

/// What the host renders after an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome {
    pub session_id: SessionId,
    /// Messages produced by this operation, including the resolved effect.
    pub emitted: Vec<ConversationMessage>,
    pub warning: Option<String>,
    pub status: SessionStatus,
    pub tone: Tone,
    pub wizard: Option<WizardProgress>,
}

impl EventOutcome {
    fn of(
        session: &ConversationSession,
        emitted: Vec<ConversationMessage>,
        warning: Option<String>,
    ) -> Self {
        Self {
            session_id: session.id(),
            emitted,
            warning,
            status: session.status(),
            tone: session.tone(),
            wizard: session.wizard_progress(),
        }
    }
}

/// Result of dispatching an action token.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub operation: HostOperation,
    pub conversation: EventOutcome,
}

#[derive(Clone)]
pub struct AssistantService {
    engine: ConversationEngine,
    config: AssistantServiceConfig,
    store: Arc<dyn SessionStore>,
    assistant: Arc<dyn RemoteAssistant>,
    gigs: Arc<dyn GigService>,
    freelancers: Arc<dyn FreelancerService>,
    lock: Arc<Mutex<()>>,
}

impl AssistantService {
    pub fn new(
        config: AssistantServiceConfig,
        store: Arc<dyn SessionStore>,
        assistant: Arc<dyn RemoteAssistant>,
        gigs: Arc<dyn GigService>,
        freelancers: Arc<dyn FreelancerService>,
    ) -> Self {
        Self {
            engine: ConversationEngine::new(config.engine),
            config,
            store,
            assistant,
            gigs,
            freelancers,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Opens a greeted session.
    pub async fn create_session(&self) -> Result<EventOutcome, AssistantServiceError> {
        let transition = self.engine.open_session(SessionId::new());
        self.store.save(&transition.session).await?;
        tracing::info!(session_id = %transition.session.id(), "assistant session opened");
        Ok(EventOutcome::of(
            &transition.session,
            transition.emitted,
            None,
        ))
    }

    /// Current state of an open session.
    pub async fn snapshot(
        &self,
        id: SessionId,
    ) -> Result<ConversationSession, AssistantServiceError> {
        self.load_open(id).await
    }

    /// Applies one host event and performs any remote call it requires.
    pub async fn handle_event(
        &self,
        id: SessionId,
        event: SessionEvent,
        ctx: &UserContext,
    ) -> Result<EventOutcome, AssistantServiceError> {
        let transition = {
            let _guard = self.lock.lock().await;
            let session = self.load_open(id).await?;
            let transition = self.engine.apply(&session, event, ctx)?;
            self.save_if_changed(&transition).await?;
            transition
        };

        self.complete(id, transition, ctx).await
    }

    /// Resolves an action token. Navigation comes back to the host; quick
    /// actions run in the session, gated like any other.
    pub async fn dispatch_action(
        &self,
        id: SessionId,
        token: &ActionToken,
        ctx: &UserContext,
    ) -> Result<ActionOutcome, AssistantServiceError> {
        let (operation, transition, session) = {
            let _guard = self.lock.lock().await;
            let session = self.load_open(id).await?;
            let result = self.engine.dispatch(&session, token, ctx)?;
            if let Some(transition) = &result.transition {
                self.save_if_changed(transition).await?;
            }
            (result.operation, result.transition, session)
        };

        tracing::debug!(session_id = %id, action = token.kind.as_str(), ?operation, "action dispatched");

        let conversation = match transition {
            Some(transition) => self.complete(id, transition, ctx).await?,
            None => EventOutcome::of(&session, Vec::new(), None),
        };
        Ok(ActionOutcome {
            operation,
            conversation,
        })
    }

    /// Ends a session. Late results for it are discarded.
    pub async fn close_session(&self, id: SessionId) -> Result<(), AssistantServiceError> {
        let _guard = self.lock.lock().await;
        let mut session = self.load_open(id).await?;
        session.close();
        self.store.save(&session).await?;
        tracing::info!(session_id = %id, "assistant session closed");
        Ok(())
    }

    /// Forgets sessions idle for longer than the configured TTL, closed
    /// markers included. Returns how many were removed.
    pub async fn expire_idle(&self) -> Result<usize, AssistantServiceError> {
        let Ok(ttl) = chrono::Duration::from_std(self.config.session_ttl) else {
            return Ok(0);
        };
        let Some(cutoff) = Utc::now().checked_sub_signed(ttl) else {
            return Ok(0);
        };

        let _guard = self.lock.lock().await;
        let removed = self.store.remove_idle(cutoff).await?;
        if removed > 0 {
            tracing::info!(removed, "idle assistant sessions expired");
        }
        Ok(removed)
    }

    /// Sessions held by the store, closed ones included.
    pub async fn session_count(&self) -> Result<usize, AssistantServiceError> {
        Ok(self.store.len().await?)
    }

    pub fn assistant_name(&self) -> &str {
        self.assistant.name()
    }

    // ════════════════════════════════════════════════════════════════════
    // Internals
    // ════════════════════════════════════════════════════════════════════

    async fn load_open(&self, id: SessionId) -> Result<ConversationSession, AssistantServiceError> {
        match self.store.load(id).await? {
            Some(session) if session.is_closed() => Err(AssistantServiceError::Closed),
            Some(session) => Ok(session),
            None => Err(AssistantServiceError::NotFound(id)),
        }
    }

    /// Rejected transitions leave the session untouched.
    async fn save_if_changed(&self, transition: &Transition) -> Result<(), SessionStoreError> {
        if transition.warning.is_none() {
            self.store.save(&transition.session).await?;
        }
        Ok(())
    }

    async fn complete(
        &self,
        id: SessionId,
        transition: Transition,
        ctx: &UserContext,
    ) -> Result<EventOutcome, AssistantServiceError> {
        let Transition {
            session,
            mut emitted,
            warning,
            effect,
        } = transition;

        let Some(effect) = effect else {
            return Ok(EventOutcome::of(&session, emitted, warning));
        };

        let this = self.clone();
        let ctx = ctx.clone();
        let settled = tokio::spawn(async move { this.settle(id, effect, &ctx).await })
            .await
            .map_err(|err| AssistantServiceError::TaskFailed(err.to_string()))??;

        let Some(resolved) = settled else {
            return Ok(EventOutcome {
                session_id: id,
                emitted,
                warning,
                status: SessionStatus::Closed,
                tone: session.tone(),
                wizard: None,
            });
        };
        emitted.extend(resolved.emitted);
        Ok(EventOutcome::of(&resolved.session, emitted, warning))
    }

    /// Performs the effect and folds its outcome into the stored session.
    /// `None` when the session was closed or expired in the meantime.
    async fn settle(
        &self,
        id: SessionId,
        effect: PendingEffect,
        ctx: &UserContext,
    ) -> Result<Option<Transition>, AssistantServiceError> {
        let kind = effect.kind();
        let outcome = self.perform(id, effect, ctx).await;

        let _guard = self.lock.lock().await;
        let current = match self.store.load(id).await? {
            Some(current) if !current.is_closed() => current,
            _ => {
                tracing::info!(session_id = %id, effect = %kind, "session closed while waiting, result dropped");
                return Ok(None);
            }
        };

        let resolved = self.engine.resolve(&current, outcome)?;
        self.store.save(&resolved.session).await?;
        Ok(Some(resolved))
    }

    async fn perform(
        &self,
        id: SessionId,
        effect: PendingEffect,
        ctx: &UserContext,
    ) -> EffectOutcome {
        let bearer = ctx
            .access_token
            .as_ref()
            .map(|token| token.expose_secret().as_str());
        let market = self.config.marketplace_policy;

        let outcome = match effect {
            PendingEffect::AskAssistant(request) => {
                let result = with_timeout_and_retry(self.config.assistant_policy, || {
                    self.assistant.chat(request.clone())
                })
                .await;
                if let Err(err) = &result {
                    tracing::warn!(session_id = %id, provider = self.assistant.name(), error = %err, "remote assistant failed");
                }
                EffectOutcome::Assistant(result.map_err(|e| e.to_string()))
            }
            PendingEffect::CreateGig(draft) => EffectOutcome::GigCreated(
                with_timeout_and_retry(market, || self.gigs.create(&draft, bearer))
                    .await
                    .map_err(|e| e.to_string()),
            ),
            PendingEffect::RegisterFreelancer(draft) => EffectOutcome::FreelancerRegistered(
                with_timeout_and_retry(market, || self.freelancers.register(&draft, bearer))
                    .await
                    .map_err(|e| e.to_string()),
            ),
            PendingEffect::SearchGigs(query) => EffectOutcome::GigsFound(
                with_timeout_and_retry(market, || {
                    self.gigs.search(&query, self.config.search_limit, bearer)
                })
                .await
                .map_err(|e| e.to_string()),
            ),
        };

        if outcome.is_success() {
            tracing::debug!(session_id = %id, effect = %outcome.kind(), "effect completed");
        } else {
            tracing::warn!(session_id = %id, effect = %outcome.kind(), "effect failed");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAssistant;
    use crate::adapters::marketplace::InMemoryMarketplace;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::actions::ActionKind;
    use crate::domain::conversation::GREETING_MESSAGE;
    use crate::domain::routing::QuickAction;
    use crate::domain::wizard::WizardKind;
    use crate::domain::routing::ALREADY_FREELANCER_MESSAGE;
    use crate::ports::AssistantError;

    struct Harness {
        service: Arc<AssistantService>,
        assistant: MockAssistant,
        market: InMemoryMarketplace,
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(200), 1).with_backoff(Duration::ZERO)
    }

    fn harness(assistant: MockAssistant) -> Harness {
        harness_with(assistant, AssistantServiceConfig::default())
    }

    fn harness_with(assistant: MockAssistant, config: AssistantServiceConfig) -> Harness {
        let market = InMemoryMarketplace::new();
        let config = AssistantServiceConfig {
            assistant_policy: fast_policy(),
            marketplace_policy: fast_policy(),
            ..config
        };
        let service = AssistantService::new(
            config,
            Arc::new(InMemorySessionStore::new()),
            Arc::new(assistant.clone()),
            Arc::new(market.clone()),
            Arc::new(market.clone()),
        );
        Harness {
            service: Arc::new(service),
            assistant,
            market,
        }
    }

    fn text(t: &str) -> SessionEvent {
        SessionEvent::Message { text: t.into() }
    }

    #[tokio::test]
    async fn create_session_greets() {
        let h = harness(MockAssistant::new());
        let opened = h.service.create_session().await.unwrap();

        assert_eq!(opened.status, SessionStatus::Ready);
        assert_eq!(opened.emitted.len(), 1);
        assert_eq!(opened.emitted[0].content, GREETING_MESSAGE);
    }

    #[tokio::test]
    async fn free_text_is_answered_by_remote_assistant() {
        let h = harness(MockAssistant::new().with_response("Price by the hour."));
        let id = h.service.create_session().await.unwrap().session_id;

        let out = h
            .service
            .handle_event(id, text("how should I price my work"), &UserContext::anonymous())
            .await
            .unwrap();

        assert_eq!(out.status, SessionStatus::Ready);
        assert_eq!(out.emitted.last().unwrap().content, "Price by the hour.");
        assert_eq!(h.assistant.call_count(), 1);
    }

    #[tokio::test]
    async fn remote_failure_is_retried_then_falls_back() {
        let h = harness(
            MockAssistant::new()
                .with_error(AssistantError::unavailable("503"))
                .with_error(AssistantError::unavailable("503")),
        );
        let id = h.service.create_session().await.unwrap().session_id;

        let out = h
            .service
            .handle_event(id, text("tell me about ratings"), &UserContext::anonymous())
            .await
            .unwrap();

        assert_eq!(h.assistant.call_count(), 2);
        assert!(out.emitted.last().unwrap().content.contains("trouble connecting"));
        assert_eq!(out.status, SessionStatus::Ready);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let h = harness(MockAssistant::new());
        let id = SessionId::new();
        let err = h
            .service
            .handle_event(id, text("hi"), &UserContext::anonymous())
            .await
            .unwrap_err();
        assert_eq!(err, AssistantServiceError::NotFound(id));
    }

    #[tokio::test]
    async fn closed_session_rejects_events() {
        let h = harness(MockAssistant::new());
        let id = h.service.create_session().await.unwrap().session_id;
        h.service.close_session(id).await.unwrap();

        assert_eq!(
            h.service.snapshot(id).await.unwrap_err(),
            AssistantServiceError::Closed
        );
        assert_eq!(
            h.service.close_session(id).await.unwrap_err(),
            AssistantServiceError::Closed
        );
    }

    #[tokio::test]
    async fn concurrent_event_while_waiting_is_busy() {
        let h = harness(
            MockAssistant::new()
                .with_delay(Duration::from_millis(100))
                .with_response("done"),
        );
        let id = h.service.create_session().await.unwrap().session_id;

        let service = h.service.clone();
        let first = tokio::spawn(async move {
            service
                .handle_event(id, text("what is a gig"), &UserContext::anonymous())
                .await
        });
        tokio::time::sleep(Duration::from_millis(30)).await;

        let second = h
            .service
            .handle_event(id, text("hello?"), &UserContext::anonymous())
            .await;
        assert_eq!(
            second.unwrap_err(),
            AssistantServiceError::Busy(EffectKind::AskAssistant)
        );
        assert!(first.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn result_dropped_when_closed_mid_flight() {
        let h = harness(
            MockAssistant::new()
                .with_delay(Duration::from_millis(100))
                .with_response("late"),
        );
        let id = h.service.create_session().await.unwrap().session_id;

        let service = h.service.clone();
        let pending = tokio::spawn(async move {
            service
                .handle_event(id, text("what is a gig"), &UserContext::anonymous())
                .await
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        h.service.close_session(id).await.unwrap();

        let out = pending.await.unwrap().unwrap();
        assert_eq!(out.status, SessionStatus::Closed);
        assert!(out.emitted.iter().all(|m| m.content != "late"));
        assert_eq!(
            h.service.snapshot(id).await.unwrap_err(),
            AssistantServiceError::Closed
        );
    }

    #[tokio::test]
    async fn cancelled_request_still_settles_session() {
        let h = harness(
            MockAssistant::new()
                .with_delay(Duration::from_millis(100))
                .with_response("worth the wait"),
        );
        let id = h.service.create_session().await.unwrap().session_id;

        let service = h.service.clone();
        let request = tokio::spawn(async move {
            service
                .handle_event(id, text("what is a gig"), &UserContext::anonymous())
                .await
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        request.abort();
        tokio::time::sleep(Duration::from_millis(300)).await;

        let session = h.service.snapshot(id).await.unwrap();
        assert_eq!(session.status(), SessionStatus::Ready);
        assert!(session
            .transcript()
            .iter()
            .any(|m| m.content == "worth the wait"));

        let next = h
            .service
            .handle_event(id, text("hello"), &UserContext::anonymous())
            .await;
        assert!(next.is_ok());
    }

    #[tokio::test]
    async fn idle_sessions_expire_after_ttl() {
        let h = harness_with(
            MockAssistant::new(),
            AssistantServiceConfig {
                session_ttl: Duration::from_millis(50),
                ..Default::default()
            },
        );
        let idle = h.service.create_session().await.unwrap().session_id;
        let closed = h.service.create_session().await.unwrap().session_id;
        h.service.close_session(closed).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let fresh = h.service.create_session().await.unwrap().session_id;

        assert_eq!(h.service.expire_idle().await.unwrap(), 2);
        assert_eq!(
            h.service.snapshot(idle).await.unwrap_err(),
            AssistantServiceError::NotFound(idle)
        );
        assert_eq!(
            h.service.close_session(closed).await.unwrap_err(),
            AssistantServiceError::NotFound(closed)
        );
        assert!(h.service.snapshot(fresh).await.is_ok());
        assert_eq!(h.service.session_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_gigs_wizard_searches_marketplace() {
        let h = harness(MockAssistant::new());
        let id = h.service.create_session().await.unwrap().session_id;
        let ctx = UserContext::freelancer().with_access_token("tok");

        let out = h
            .service
            .handle_event(
                id,
                SessionEvent::QuickAction {
                    action: QuickAction::FindGigs,
                },
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(out.wizard.unwrap().kind, WizardKind::FindGigs);

        h.service.handle_event(id, text("Tutoring"), &ctx).await.unwrap();
        h.service.handle_event(id, text(""), &ctx).await.unwrap();
        let done = h.service.handle_event(id, text("No"), &ctx).await.unwrap();

        assert!(done.wizard.is_none());
        let last = done.emitted.last().unwrap();
        assert_eq!(last.action.as_ref().unwrap().kind, ActionKind::SearchGigs);
        let searches = h.market.searches().await;
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].category.as_deref(), Some("Tutoring"));
        assert_eq!(h.market.bearers().await, vec![Some("tok".to_string())]);
    }

    #[tokio::test]
    async fn navigation_actions_leave_session_alone() {
        let h = harness(MockAssistant::new());
        let id = h.service.create_session().await.unwrap().session_id;

        let out = h
            .service
            .dispatch_action(id, &ActionToken::auth_required(), &UserContext::anonymous())
            .await
            .unwrap();

        assert_eq!(out.operation, HostOperation::NavigateToAuth);
        assert!(out.conversation.emitted.is_empty());
        assert_eq!(h.service.snapshot(id).await.unwrap().transcript().len(), 1);
    }

    #[tokio::test]
    async fn registration_offer_starts_wizard() {
        let h = harness(MockAssistant::new());
        let id = h.service.create_session().await.unwrap().session_id;

        let out = h
            .service
            .dispatch_action(
                id,
                &ActionToken::offer_freelancer_registration(),
                &UserContext::authenticated(),
            )
            .await
            .unwrap();

        assert!(out.operation.re_enters_conversation());
        let progress = out.conversation.wizard.unwrap();
        assert_eq!(progress.kind, WizardKind::RegisterFreelancer);
        assert_eq!(progress.step_key, "categories");
    }

    #[tokio::test]
    async fn registration_offer_asks_anonymous_user_to_sign_in() {
        let h = harness(MockAssistant::new());
        let id = h.service.create_session().await.unwrap().session_id;

        let out = h
            .service
            .dispatch_action(
                id,
                &ActionToken::offer_freelancer_registration(),
                &UserContext::anonymous(),
            )
            .await
            .unwrap();

        assert!(out.conversation.wizard.is_none());
        let last = out.conversation.emitted.last().unwrap();
        assert_eq!(last.action.as_ref().unwrap().kind, ActionKind::AuthRequired);
        assert!(h.service.snapshot(id).await.unwrap().wizard().is_none());
    }

    #[tokio::test]
    async fn registration_offer_tells_freelancer_they_are_registered() {
        let h = harness(MockAssistant::new());
        let id = h.service.create_session().await.unwrap().session_id;

        let out = h
            .service
            .dispatch_action(
                id,
                &ActionToken::offer_freelancer_registration(),
                &UserContext::freelancer(),
            )
            .await
            .unwrap();

        assert!(out.conversation.wizard.is_none());
        assert_eq!(
            out.conversation.emitted.last().unwrap().content,
            ALREADY_FREELANCER_MESSAGE
        );
    }
}
