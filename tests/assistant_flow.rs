//! End-to-end conversation flows through `AssistantService`.
//!
//! The remote assistant is a `MockAssistant` and the marketplace is an
//! `InMemoryMarketplace`, so every flow runs without a network.

use std::sync::Arc;
use std::time::Duration;

use career_plus_assistant::adapters::ai::MockAssistant;
use career_plus_assistant::adapters::marketplace::InMemoryMarketplace;
use career_plus_assistant::adapters::resilience::RetryPolicy;
use career_plus_assistant::adapters::storage::InMemorySessionStore;
use career_plus_assistant::application::{
    AssistantService, AssistantServiceConfig, EventOutcome,
};
use career_plus_assistant::domain::actions::{ActionKind, HostOperation};
use career_plus_assistant::domain::conversation::{SessionEvent, SessionStatus};
use career_plus_assistant::domain::foundation::SessionId;
use career_plus_assistant::domain::routing::{QuickAction, UserContext};
use career_plus_assistant::domain::tone::Tone;
use career_plus_assistant::domain::wizard::{InputType, WizardKind};
use career_plus_assistant::ports::MarketplaceError;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct App {
    service: Arc<AssistantService>,
    assistant: MockAssistant,
    market: InMemoryMarketplace,
}

impl App {
    fn new(assistant: MockAssistant) -> Self {
        let market = InMemoryMarketplace::new();
        let policy = RetryPolicy::new(Duration::from_millis(500), 1).with_backoff(Duration::ZERO);
        let config = AssistantServiceConfig {
            assistant_policy: policy,
            marketplace_policy: policy,
            ..Default::default()
        };
        let service = AssistantService::new(
            config,
            Arc::new(InMemorySessionStore::new()),
            Arc::new(assistant.clone()),
            Arc::new(market.clone()),
            Arc::new(market.clone()),
        );
        Self {
            service: Arc::new(service),
            assistant,
            market,
        }
    }

    async fn open(&self) -> SessionId {
        self.service.create_session().await.unwrap().session_id
    }

    async fn say(&self, id: SessionId, text: &str, ctx: &UserContext) -> EventOutcome {
        self.service
            .handle_event(id, SessionEvent::Message { text: text.into() }, ctx)
            .await
            .unwrap()
    }

    async fn send(&self, id: SessionId, event: SessionEvent, ctx: &UserContext) -> EventOutcome {
        self.service.handle_event(id, event, ctx).await.unwrap()
    }
}

fn last_text(outcome: &EventOutcome) -> &str {
    &outcome.emitted.last().expect("no message emitted").content
}

fn signed_in() -> UserContext {
    UserContext::authenticated().with_access_token("user-token")
}

// =============================================================================
// Post gig
// =============================================================================

#[tokio::test]
async fn post_gig_flow_creates_gig_and_links_to_it() {
    let app = App::new(MockAssistant::new());
    let id = app.open().await;
    let ctx = signed_in();

    let started = app.say(id, "I want to post a gig", &ctx).await;
    assert_eq!(started.wizard.as_ref().unwrap().kind, WizardKind::PostGig);
    assert_eq!(started.wizard.as_ref().unwrap().step_key, "title");

    app.say(id, "Landing page for a bakery", &ctx).await;
    app.say(id, "Single page site with a menu and contact form", &ctx).await;
    let category = app.say(id, "web development", &ctx).await;
    // Not "Other", so the custom category step is skipped.
    assert_eq!(category.wizard.as_ref().unwrap().step_key, "location");

    app.say(id, "Remote", &ctx).await;
    app.say(id, "150", &ctx).await;
    app.say(id, "300", &ctx).await;
    app.say(id, "2026-11-01", &ctx).await;
    app.say(id, "2026-11-15", &ctx).await;
    let people = app.say(id, "2", &ctx).await;
    let input = people.emitted.last().unwrap().input_config.as_ref().unwrap();
    assert_eq!(input.input_type, InputType::SingleSelect);

    let done = app.say(id, "Yes", &ctx).await;

    assert!(done.wizard.is_none());
    assert_eq!(done.status, SessionStatus::Ready);
    let action = done.emitted.last().unwrap().action.as_ref().unwrap();
    assert_eq!(action.kind, ActionKind::ViewGig);
    assert_eq!(action.data_str("gig_id"), Some("gig-1"));

    let drafts = app.market.created_drafts().await;
    assert_eq!(drafts.len(), 1);
    let gig = &drafts[0];
    assert_eq!(gig.category, "Web Development");
    assert_eq!(gig.budget_min, 150.0);
    assert_eq!(gig.people_needed, 2);
    assert!(gig.is_urgent);
    assert_eq!(
        app.market.bearers().await,
        vec![Some("user-token".to_string())]
    );
    assert_eq!(app.assistant.call_count(), 0);
}

#[tokio::test]
async fn other_category_asks_for_custom_name() {
    let app = App::new(MockAssistant::new());
    let id = app.open().await;
    let ctx = signed_in();

    app.send(
        id,
        SessionEvent::QuickAction {
            action: QuickAction::PostGig,
        },
        &ctx,
    )
    .await;
    app.say(id, "Dog walker", &ctx).await;
    app.say(id, "Walk two dogs every morning", &ctx).await;
    let other = app.say(id, "Other", &ctx).await;
    assert_eq!(other.wizard.unwrap().step_key, "custom_category");

    app.say(id, "Pet Care", &ctx).await;
    for answer in ["Dhaka", "10", "20", "2026-11-01", "2026-11-30", "1", "No"] {
        app.say(id, answer, &ctx).await;
    }

    let drafts = app.market.created_drafts().await;
    assert_eq!(drafts[0].category, "Pet Care");
    assert!(!drafts[0].is_urgent);
}

#[tokio::test]
async fn rejected_gig_reports_detail_and_ends_wizard() {
    let app = App::new(MockAssistant::new());
    let id = app.open().await;
    let ctx = signed_in();

    app.say(id, "post a job please", &ctx).await;
    for answer in [
        "Tutor",
        "Algebra tutoring",
        "Tutoring",
        "Remote",
        "500",
        "100",
        "2026-11-01",
        "2026-12-01",
        "1",
    ] {
        app.say(id, answer, &ctx).await;
    }
    let done = app.say(id, "No", &ctx).await;

    assert!(done.wizard.is_none());
    assert!(last_text(&done).contains("Maximum budget must not be lower than minimum budget"));
    assert_eq!(app.market.gig_count().await, 0);
}

#[tokio::test]
async fn invalid_answer_is_a_warning_and_keeps_the_step() {
    let app = App::new(MockAssistant::new());
    let id = app.open().await;
    let ctx = signed_in();

    app.say(id, "post a gig", &ctx).await;
    for answer in ["Logo", "A logo", "Graphic Design", "Remote", "50", "80"] {
        app.say(id, answer, &ctx).await;
    }
    let bad = app.say(id, "next tuesday", &ctx).await;

    assert!(bad.warning.is_some());
    assert!(bad.emitted.is_empty());
    assert_eq!(bad.wizard.unwrap().step_key, "duration_start");
}

#[tokio::test]
async fn cancel_leaves_the_wizard() {
    let app = App::new(MockAssistant::new());
    let id = app.open().await;
    let ctx = signed_in();

    app.say(id, "post a gig", &ctx).await;
    let cancelled = app.send(id, SessionEvent::Cancel, &ctx).await;

    assert!(cancelled.wizard.is_none());
    assert!(last_text(&cancelled).contains("cancelled"));
}

// =============================================================================
// Freelancer registration and search
// =============================================================================

#[tokio::test]
async fn register_freelancer_with_multi_select() {
    let app = App::new(MockAssistant::new());
    let id = app.open().await;
    let ctx = signed_in();

    let started = app
        .send(
            id,
            SessionEvent::QuickAction {
                action: QuickAction::RegisterFreelancer,
            },
            &ctx,
        )
        .await;
    assert_eq!(started.wizard.unwrap().step_key, "categories");

    app.send(id, SessionEvent::ToggleOption { option: "Tutoring".into() }, &ctx).await;
    app.send(id, SessionEvent::ToggleOption { option: "Translation".into() }, &ctx).await;
    let toggled = app
        .send(id, SessionEvent::ToggleOption { option: "Tutoring".into() }, &ctx)
        .await;
    assert_eq!(toggled.wizard.unwrap().selected, vec!["Translation".to_string()]);

    let confirmed = app.send(id, SessionEvent::ConfirmSelection, &ctx).await;
    assert_eq!(confirmed.wizard.unwrap().step_key, "availability");

    app.say(id, "weekends", &ctx).await;
    app.say(id, "Chittagong", &ctx).await;
    app.say(id, "Bilingual student translator", &ctx).await;
    let done = app.say(id, "", &ctx).await;

    let action = done.emitted.last().unwrap().action.as_ref().unwrap();
    assert_eq!(action.kind, ActionKind::FindMatchingGigs);

    let drafts = app.market.registered_drafts().await;
    assert_eq!(drafts[0].categories, vec!["Translation".to_string()]);
    assert_eq!(drafts[0].availability, "Weekends");
    assert_eq!(drafts[0].hourly_rate, None);
}

#[tokio::test]
async fn confirm_with_nothing_selected_is_rejected() {
    let app = App::new(MockAssistant::new());
    let id = app.open().await;
    let ctx = signed_in();

    app.say(id, "I want to become a freelancer", &ctx).await;
    let empty = app.send(id, SessionEvent::ConfirmSelection, &ctx).await;

    assert!(empty.warning.is_some());
    assert_eq!(empty.wizard.unwrap().step_key, "categories");
}

#[tokio::test]
async fn find_gigs_requires_sign_in_and_freelancer_profile() {
    let app = App::new(MockAssistant::new());
    let id = app.open().await;

    let anon = app.say(id, "find me some gigs", &UserContext::anonymous()).await;
    assert_eq!(
        anon.emitted.last().unwrap().action.as_ref().unwrap().kind,
        ActionKind::AuthRequired
    );

    let member = app.say(id, "find me some gigs", &signed_in()).await;
    let offer = member.emitted.last().unwrap().action.clone().unwrap();
    assert_eq!(offer.kind, ActionKind::OfferFreelancerRegistration);

    let dispatched = app
        .service
        .dispatch_action(id, &offer, &signed_in())
        .await
        .unwrap();
    assert_eq!(
        dispatched.operation,
        HostOperation::RunQuickAction {
            action: QuickAction::RegisterFreelancer
        }
    );
    assert_eq!(
        dispatched.conversation.wizard.map(|w| w.kind),
        Some(WizardKind::RegisterFreelancer)
    );
}

#[tokio::test]
async fn find_gigs_returns_results_as_attachments() {
    let app = App::new(MockAssistant::new());
    let id = app.open().await;
    let ctx = UserContext::freelancer();

    // Seed one gig through the marketplace itself.
    let poster = app.open().await;
    app.say(poster, "post a gig", &signed_in()).await;
    for answer in [
        "Translate a menu",
        "Bangla to English",
        "Translation",
        "Remote",
        "20",
        "40",
        "2026-11-01",
        "2026-11-02",
        "1",
        "Yes",
    ] {
        app.say(poster, answer, &signed_in()).await;
    }

    app.say(id, "search for translation work", &ctx).await;
    app.say(id, "Translation", &ctx).await;
    app.say(id, "remote", &ctx).await;
    let done = app.say(id, "Yes", &ctx).await;

    let message = done.emitted.last().unwrap();
    assert_eq!(message.attachments.len(), 1);
    assert_eq!(message.attachments[0].title, "Translate a menu");
    assert_eq!(message.action.as_ref().unwrap().kind, ActionKind::SearchGigs);
}

#[tokio::test]
async fn marketplace_outage_is_retried_once() {
    let app = App::new(MockAssistant::new());
    let id = app.open().await;
    let ctx = UserContext::freelancer();

    app.say(id, "find gigs", &ctx).await;
    app.say(id, "Any category", &ctx).await;
    app.say(id, "", &ctx).await;
    app.market
        .fail_next_with(MarketplaceError::Unavailable("HTTP 503".into()))
        .await;
    let done = app.say(id, "No", &ctx).await;

    assert_eq!(app.market.searches().await.len(), 2);
    assert_eq!(app.market.searches().await[1].category, None);
    assert!(last_text(&done).contains("no gigs match"));
}

// =============================================================================
// Free text and tone
// =============================================================================

#[tokio::test]
async fn free_text_carries_bounded_history() {
    let app = App::new(MockAssistant::new());
    let id = app.open().await;
    let ctx = UserContext::anonymous().with_page("/gigs");

    for i in 0..20 {
        app.say(id, &format!("question number {}", i), &ctx).await;
    }

    let calls = app.assistant.get_calls();
    assert_eq!(calls.len(), 20);
    let last = calls.last().unwrap();
    assert_eq!(last.message, "question number 19");
    assert_eq!(last.context.history.len(), 30);
    assert_eq!(last.context.current_page.as_deref(), Some("/gigs"));
}

#[tokio::test]
async fn genz_user_gets_genz_prompts() {
    let app = App::new(MockAssistant::new().with_response("Thanks for asking!"));
    let id = app.open().await;

    let reply = app.say(id, "ngl what even is a gig bestie", &UserContext::anonymous()).await;
    assert_eq!(reply.tone, Tone::Genz);
    assert_eq!(last_text(&reply), "Thx fam for asking!");

    let started = app.say(id, "bruh let me post a gig", &signed_in()).await;
    assert!(last_text(&started).starts_with("Yoo that's fire!"));
}

#[tokio::test]
async fn suggested_search_navigates_with_filters() {
    let app = App::new(
        MockAssistant::new()
            .with_response("On it!\n\n[SEARCH_GIGS]\nCategory: tutoring\nLocation: Dhaka\nIs Urgent: yes"),
    );
    let id = app.open().await;

    let reply = app.say(id, "any tutoring near dhaka?", &UserContext::anonymous()).await;
    let token = reply.emitted.last().unwrap().action.clone().unwrap();
    assert_eq!(token.kind, ActionKind::SearchGigs);

    let dispatched = app
        .service
        .dispatch_action(id, &token, &UserContext::anonymous())
        .await
        .unwrap();
    match dispatched.operation {
        HostOperation::NavigateToSearch { filters } => {
            assert_eq!(filters.category.as_deref(), Some("Tutoring"));
            assert_eq!(filters.location.as_deref(), Some("Dhaka"));
            assert_eq!(filters.is_urgent, Some(true));
        }
        other => panic!("expected search navigation, got {:?}", other),
    }
}
