//! Ports - interfaces the application core depends on.
//!
//! Adapters under `crate::adapters` implement these traits.

mod marketplace;
mod remote_assistant;
mod session_store;

pub use marketplace::{FreelancerService, GigService, MarketplaceError};
pub use remote_assistant::{AssistantError, RemoteAssistant};
pub use session_store::{SessionStore, SessionStoreError};
