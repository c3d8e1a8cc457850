//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - remote assistant (OpenAI, mock)
//! - `marketplace` - gig and freelancer services (REST client, in-memory)
//! - `storage` - session store
//! - `resilience` - timeout and retry around remote calls
//! - `http` - axum REST API

pub mod ai;
pub mod http;
pub mod marketplace;
pub mod resilience;
pub mod storage;
