//! Intent Router - chooses what to do with input when no wizard is active.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::actions::ActionToken;
use crate::domain::wizard::WizardKind;

use super::context::UserContext;

pub const AUTH_REQUIRED_MESSAGE: &str =
    "Hey! You'll need to sign in first. Log in or create an account and I'll take it from there.";

pub const OFFER_REGISTRATION_MESSAGE: &str =
    "Sorry, finding gigs is for registered freelancers. Want to set up your freelancer profile? It only takes a minute.";

pub const ALREADY_FREELANCER_MESSAGE: &str =
    "Great! You're already registered as a freelancer. Ask me to find gigs whenever you're ready.";

pub const HELP_MESSAGE: &str = "Hey! Here's what I can do:\n\
    - Find gigs that match your skills\n\
    - Post a gig and find help fast\n\
    - Set up your freelancer profile\n\
    - Answer questions about pricing, profiles and the platform\n\
    Just tell me what you need!";

/// Fixed shortcuts the host can trigger directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    FindGigs,
    PostGig,
    RegisterFreelancer,
    Help,
}

impl QuickAction {
    /// Button text, recorded as the user's turn in the transcript.
    pub fn label(&self) -> &'static str {
        match self {
            QuickAction::FindGigs => "Find gigs",
            QuickAction::PostGig => "Post a gig",
            QuickAction::RegisterFreelancer => "Become a freelancer",
            QuickAction::Help => "Help",
        }
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuickAction::FindGigs => "find_gigs",
            QuickAction::PostGig => "post_gig",
            QuickAction::RegisterFreelancer => "register_freelancer",
            QuickAction::Help => "help",
        };
        write!(f, "{}", s)
    }
}

/// What the router decided.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteDecision {
    /// Gating passed; start this wizard.
    StartWizard(WizardKind),
    /// A precondition is unmet; explain and offer one way forward.
    Gated {
        message: &'static str,
        suggestion: ActionToken,
    },
    /// Answer locally with a fixed message.
    Reply(&'static str),
    /// Nothing matched; ask the remote assistant.
    Delegate,
}

/// Deterministic router over quick actions and free text.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentRouter;

impl IntentRouter {
    /// Routes a quick action through its gate.
    pub fn route_quick_action(&self, action: QuickAction, ctx: &UserContext) -> RouteDecision {
        match action {
            QuickAction::FindGigs => gate_find_gigs(ctx),
            QuickAction::PostGig => gate_post_gig(ctx),
            QuickAction::RegisterFreelancer => gate_register_freelancer(ctx),
            QuickAction::Help => RouteDecision::Reply(HELP_MESSAGE),
        }
    }

    /// Routes free text. Heuristics are checked in a fixed order and the
    /// first match wins.
    pub fn route_text(&self, text: &str, ctx: &UserContext) -> RouteDecision {
        let lowercase = text.to_lowercase();
        let text = lowercase.as_str();

        if text.contains("post") && contains_any(text, &["gig", "job"]) {
            return gate_post_gig(ctx);
        }

        if contains_any(text, &["register", "become", "sign up as"]) && text.contains("freelancer") {
            return gate_register_freelancer(ctx);
        }

        if contains_any(text, &["find", "search", "look for"])
            && contains_any(text, &["gig", "job", "work"])
        {
            return gate_find_gigs(ctx);
        }

        RouteDecision::Delegate
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

fn auth_required() -> RouteDecision {
    RouteDecision::Gated {
        message: AUTH_REQUIRED_MESSAGE,
        suggestion: ActionToken::auth_required(),
    }
}

fn gate_find_gigs(ctx: &UserContext) -> RouteDecision {
    if !ctx.is_authenticated {
        return auth_required();
    }
    if !ctx.is_freelancer {
        return RouteDecision::Gated {
            message: OFFER_REGISTRATION_MESSAGE,
            suggestion: ActionToken::offer_freelancer_registration(),
        };
    }
    RouteDecision::StartWizard(WizardKind::FindGigs)
}

fn gate_post_gig(ctx: &UserContext) -> RouteDecision {
    if !ctx.is_authenticated {
        return auth_required();
    }
    RouteDecision::StartWizard(WizardKind::PostGig)
}

fn gate_register_freelancer(ctx: &UserContext) -> RouteDecision {
    if !ctx.is_authenticated {
        return auth_required();
    }
    if ctx.is_freelancer {
        return RouteDecision::Reply(ALREADY_FREELANCER_MESSAGE);
    }
    RouteDecision::StartWizard(WizardKind::RegisterFreelancer)
}
