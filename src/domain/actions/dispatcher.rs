//! Action Dispatcher - resolves action tokens into host operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::GigId;
use crate::domain::routing::QuickAction;
use crate::domain::wizard::{match_option, steps_for, GigSearchQuery, WizardKind, ANY_CATEGORY};

use super::token::{ActionKind, ActionToken};

/// A concrete operation for the host, or for the session to re-enter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum HostOperation {
    NavigateToAuth,
    NavigateToGig { gig_id: GigId },
    NavigateToSearch { filters: GigSearchQuery },
    NavigateToProfile,
    RunQuickAction { action: QuickAction },
    Noop,
}

impl HostOperation {
    /// Operations the session handles itself instead of handing to the host.
    pub fn re_enters_conversation(&self) -> bool {
        matches!(self, HostOperation::RunQuickAction { .. })
    }
}

/// Total mapping from tokens to host operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionDispatcher;

impl ActionDispatcher {
    pub fn dispatch(&self, token: &ActionToken) -> HostOperation {
        match token.kind {
            ActionKind::AuthRequired => HostOperation::NavigateToAuth,
            // Tokens can outlive the context they were offered in, so both
            // go back through gating.
            ActionKind::OfferFreelancerRegistration | ActionKind::RegisterFreelancer => {
                HostOperation::RunQuickAction {
                    action: QuickAction::RegisterFreelancer,
                }
            }
            ActionKind::PostGig => HostOperation::RunQuickAction {
                action: QuickAction::PostGig,
            },
            ActionKind::ViewGig | ActionKind::ApplyGig => gig_id(token)
                .map(|gig_id| HostOperation::NavigateToGig { gig_id })
                .unwrap_or(HostOperation::Noop),
            ActionKind::FindMatchingGigs => HostOperation::RunQuickAction {
                action: QuickAction::FindGigs,
            },
            ActionKind::SearchGigs => HostOperation::NavigateToSearch {
                filters: search_filters(token),
            },
            ActionKind::UpdateProfile => HostOperation::NavigateToProfile,
            ActionKind::Unknown => HostOperation::Noop,
        }
    }
}

fn gig_id(token: &ActionToken) -> Option<GigId> {
    token
        .data_str("gig_id")
        .or_else(|| token.data_str("id"))
        .and_then(|id| GigId::new(id).ok())
}

/// Reads search filters from either a wizard-built payload or the string
/// fields parsed from an assistant marker.
fn search_filters(token: &ActionToken) -> GigSearchQuery {
    let category_step = &steps_for(WizardKind::FindGigs)[0];
    let category = token.data_str("category").and_then(|raw| {
        let canonical = match_option(category_step, raw).unwrap_or(raw);
        (canonical != ANY_CATEGORY).then(|| canonical.to_string())
    });

    let is_urgent = match token.data.get("is_urgent") {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "yes" | "true" => Some(true),
            "no" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    };

    GigSearchQuery {
        category,
        location: token.data_str("location").map(str::to_string),
        is_urgent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_required_navigates_to_auth() {
        assert_eq!(
            ActionDispatcher.dispatch(&ActionToken::auth_required()),
            HostOperation::NavigateToAuth
        );
    }

    #[test]
    fn registration_offer_reruns_gated_quick_action() {
        let op = ActionDispatcher.dispatch(&ActionToken::offer_freelancer_registration());
        assert_eq!(
            op,
            HostOperation::RunQuickAction {
                action: QuickAction::RegisterFreelancer
            }
        );
        assert!(op.re_enters_conversation());
    }

    #[test]
    fn view_gig_navigates_to_gig() {
        let id = GigId::new("gig-7").unwrap();
        assert_eq!(
            ActionDispatcher.dispatch(&ActionToken::view_gig(&id)),
            HostOperation::NavigateToGig { gig_id: id }
        );
    }

    #[test]
    fn view_gig_without_id_is_noop() {
        let token = ActionToken::new(ActionKind::ViewGig, json!({}));
        assert_eq!(ActionDispatcher.dispatch(&token), HostOperation::Noop);
    }

    #[test]
    fn find_matching_gigs_reruns_quick_action() {
        assert_eq!(
            ActionDispatcher.dispatch(&ActionToken::find_matching_gigs()),
            HostOperation::RunQuickAction {
                action: QuickAction::FindGigs
            }
        );
    }

    #[test]
    fn search_gigs_from_marker_strings() {
        let token = ActionToken::new(
            ActionKind::SearchGigs,
            json!({"category": "web development", "location": "Dhaka", "is_urgent": "Yes"}),
        );
        assert_eq!(
            ActionDispatcher.dispatch(&token),
            HostOperation::NavigateToSearch {
                filters: GigSearchQuery {
                    category: Some("Web Development".into()),
                    location: Some("Dhaka".into()),
                    is_urgent: Some(true),
                }
            }
        );
    }

    #[test]
    fn unknown_token_is_noop() {
        let token: ActionToken =
            serde_json::from_value(json!({"type": "SELF_DESTRUCT"})).unwrap();
        assert_eq!(ActionDispatcher.dispatch(&token), HostOperation::Noop);
    }

    #[test]
    fn host_operation_serializes_tagged() {
        let json = serde_json::to_value(HostOperation::RunQuickAction {
            action: QuickAction::RegisterFreelancer,
        })
        .unwrap();
        assert_eq!(
            json,
            json!({"operation": "run_quick_action", "action": "register_freelancer"})
        );
    }
}
