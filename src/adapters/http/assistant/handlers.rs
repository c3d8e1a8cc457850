//! HTTP handlers for assistant endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{AssistantService, AssistantServiceError};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::routing::UserContext;
use crate::domain::wizard::GIG_CATEGORIES;

use super::dto::{
    ActionRequest, ActionResponse, CategoriesResponse, ErrorResponse, EventRequest,
    EventResponse, HealthResponse, SessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AssistantAppState {
    service: Arc<AssistantService>,
}

impl AssistantAppState {
    pub fn new(service: Arc<AssistantService>) -> Self {
        Self { service }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/assistant/sessions - Open a session
pub async fn create_session(State(state): State<AssistantAppState>) -> Response {
    match state.service.create_session().await {
        Ok(outcome) => {
            let response: EventResponse = outcome.into();
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_service_error(e),
    }
}

/// GET /api/assistant/sessions/:id - Session view
pub async fn get_session(
    State(state): State<AssistantAppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.snapshot(session_id).await {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => handle_service_error(e),
    }
}

/// POST /api/assistant/sessions/:id/events - Apply a host event
pub async fn post_event(
    State(state): State<AssistantAppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<EventRequest>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let ctx = with_bearer(req.context, &headers);

    match state.service.handle_event(session_id, req.event, &ctx).await {
        Ok(outcome) => {
            let response: EventResponse = outcome.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_service_error(e),
    }
}

/// POST /api/assistant/sessions/:id/actions - Resolve an action token
pub async fn post_action(
    State(state): State<AssistantAppState>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<ActionRequest>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let ctx = with_bearer(req.context, &headers);

    match state.service.dispatch_action(session_id, &req.action, &ctx).await {
        Ok(outcome) => {
            let response: ActionResponse = outcome.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_service_error(e),
    }
}

/// DELETE /api/assistant/sessions/:id - Tear down a session
pub async fn close_session(
    State(state): State<AssistantAppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.service.close_session(session_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_service_error(e),
    }
}

/// GET /api/categories - Gig categories
pub async fn list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: GIG_CATEGORIES.to_vec(),
    })
}

/// GET /api/health
pub async fn health(State(state): State<AssistantAppState>) -> Response {
    match state.service.session_count().await {
        Ok(sessions) => Json(HealthResponse {
            status: "ok",
            sessions,
            assistant: state.service.assistant_name().to_string(),
        })
        .into_response(),
        Err(e) => handle_service_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Request helpers
// ════════════════════════════════════════════════════════════════════════════

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session ID")),
        )
            .into_response()
    })
}

/// Bearer token from `Authorization`, if present.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn with_bearer(ctx: UserContext, headers: &HeaderMap) -> UserContext {
    match bearer_token(headers) {
        Some(token) => ctx.with_access_token(token),
        None => ctx,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_service_error(error: AssistantServiceError) -> Response {
    let (status, domain) = match &error {
        AssistantServiceError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            DomainError::new(ErrorCode::SessionNotFound, error.to_string())
                .with_detail("session_id", id.to_string()),
        ),
        AssistantServiceError::Busy(kind) => (
            StatusCode::CONFLICT,
            DomainError::new(ErrorCode::SessionBusy, error.to_string())
                .with_detail("waiting_on", kind.to_string()),
        ),
        AssistantServiceError::Closed => (
            StatusCode::GONE,
            DomainError::new(ErrorCode::SessionClosed, error.to_string()),
        ),
        AssistantServiceError::OutOfSync(_) => (
            StatusCode::CONFLICT,
            DomainError::new(ErrorCode::InvalidStateTransition, error.to_string()),
        ),
        AssistantServiceError::Storage(_) => {
            tracing::error!(error = %error, "session store failure");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                DomainError::new(ErrorCode::InternalError, error.to_string()),
            )
        }
        AssistantServiceError::TaskFailed(_) => {
            tracing::error!(error = %error, "effect task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                DomainError::new(ErrorCode::InternalError, error.to_string()),
            )
        }
    };
    (status, Json(ErrorResponse::from(domain))).into_response()
}
