//! HTTP adapter for the conversational assistant.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ActionRequest, ActionResponse, CategoriesResponse, ErrorResponse, EventRequest,
    EventResponse, HealthResponse, SessionResponse,
};
pub use handlers::AssistantAppState;
pub use routes::assistant_routes;
