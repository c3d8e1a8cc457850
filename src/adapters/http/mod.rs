//! HTTP adapters - REST API implementations.
//!
//! `api_router` mounts the assistant endpoints under `/api` and adds request
//! tracing, CORS and a request timeout.

pub mod assistant;

use std::time::Duration;

use axum::Router;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use assistant::{assistant_routes, AssistantAppState};

/// Full API router. An empty origin list allows any origin.
pub fn api_router(
    state: AssistantAppState,
    cors_origins: &[String],
    request_timeout: Duration,
) -> Router {
    Router::new()
        .nest("/api", assistant_routes(state))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(allowed))
}
