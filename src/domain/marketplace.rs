//! Marketplace value types returned by the gig and freelancer services.

use serde::{Deserialize, Serialize};

use super::foundation::GigId;

/// Compact gig listing attached to assistant messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GigSummary {
    pub id: GigId,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub budget_min: f64,
    #[serde(default)]
    pub budget_max: f64,
    #[serde(default)]
    pub is_urgent: bool,
}

/// Acknowledgement of a created gig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedGig {
    pub id: GigId,
}

/// Freelancer profile as stored by the marketplace after registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreelancerProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
}
