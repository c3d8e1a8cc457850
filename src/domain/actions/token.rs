//! Action tokens attached to assistant messages.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

use crate::domain::foundation::GigId;
use crate::domain::wizard::GigSearchQuery;

/// The instruction an action token carries.
///
/// Tokens arriving from the remote assistant are free-form, so any name this
/// crate does not know deserializes as [`ActionKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    AuthRequired,
    OfferFreelancerRegistration,
    ViewGig,
    FindMatchingGigs,
    SearchGigs,
    PostGig,
    RegisterFreelancer,
    UpdateProfile,
    ApplyGig,
    #[serde(other)]
    Unknown,
}

impl ActionKind {
    /// Wire name, also used as the `[MARKER]` in assistant replies.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::AuthRequired => "AUTH_REQUIRED",
            ActionKind::OfferFreelancerRegistration => "OFFER_FREELANCER_REGISTRATION",
            ActionKind::ViewGig => "VIEW_GIG",
            ActionKind::FindMatchingGigs => "FIND_MATCHING_GIGS",
            ActionKind::SearchGigs => "SEARCH_GIGS",
            ActionKind::PostGig => "POST_GIG",
            ActionKind::RegisterFreelancer => "REGISTER_FREELANCER",
            ActionKind::UpdateProfile => "UPDATE_PROFILE",
            ActionKind::ApplyGig => "APPLY_GIG",
            ActionKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An opaque instruction for the host, resolved by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionToken {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default)]
    pub data: Value,
}

impl ActionToken {
    pub fn new(kind: ActionKind, data: Value) -> Self {
        Self { kind, data }
    }

    pub fn auth_required() -> Self {
        Self::new(ActionKind::AuthRequired, Value::Object(Map::new()))
    }

    pub fn offer_freelancer_registration() -> Self {
        Self::new(
            ActionKind::OfferFreelancerRegistration,
            Value::Object(Map::new()),
        )
    }

    pub fn view_gig(id: &GigId) -> Self {
        Self::new(ActionKind::ViewGig, json!({ "gig_id": id.as_str() }))
    }

    pub fn find_matching_gigs() -> Self {
        Self::new(ActionKind::FindMatchingGigs, Value::Object(Map::new()))
    }

    pub fn search_gigs(query: &GigSearchQuery) -> Self {
        let data = serde_json::to_value(query).unwrap_or_else(|_| Value::Object(Map::new()));
        Self::new(ActionKind::SearchGigs, data)
    }

    /// String field from the payload.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
