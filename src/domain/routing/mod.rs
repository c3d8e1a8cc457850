//! Intent routing for input that arrives while no wizard is active.

mod context;
mod router;

pub use context::UserContext;
pub use router::{
    IntentRouter, QuickAction, RouteDecision, ALREADY_FREELANCER_MESSAGE, AUTH_REQUIRED_MESSAGE,
    HELP_MESSAGE, OFFER_REGISTRATION_MESSAGE,
};
