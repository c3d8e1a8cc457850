//! Application layer - hosts sessions and coordinates domain and ports.
//!
//! The domain decides; this layer loads, saves and performs the remote calls
//! the domain asks for.

mod assistant_service;

pub use assistant_service::{
    ActionOutcome, AssistantService, AssistantServiceConfig, AssistantServiceError, EventOutcome,
};
