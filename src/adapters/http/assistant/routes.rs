//! HTTP routes for assistant endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    close_session, create_session, get_session, health, list_categories, post_action,
    post_event, AssistantAppState,
};

/// Creates the assistant router. Mounted under `/api`.
pub fn assistant_routes(state: AssistantAppState) -> Router {
    Router::new()
        .route("/assistant/sessions", post(create_session))
        .route(
            "/assistant/sessions/:id",
            get(get_session).delete(close_session),
        )
        .route("/assistant/sessions/:id/events", post(post_event))
        .route("/assistant/sessions/:id/actions", post(post_action))
        .route("/categories", get(list_categories))
        .route("/health", get(health))
        .with_state(state)
}
