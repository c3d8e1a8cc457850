//! Creation payloads built from completed wizards.

use serde::{Deserialize, Serialize};

use super::registry::{WizardKind, ANY_CATEGORY};
use super::state::{Collected, FieldValue};

/// Gig creation request sent to the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GigDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub budget_min: f64,
    pub budget_max: f64,
    pub duration_start: String,
    pub duration_end: String,
    pub people_needed: u32,
    pub is_urgent: bool,
}

/// Freelancer registration request sent to the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreelancerDraft {
    pub categories: Vec<String>,
    pub availability: String,
    pub location: String,
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
}

/// Gig search filters. `None` means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GigSearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_urgent: Option<bool>,
}

/// Terminal request produced by a completed wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardPayload {
    CreateGig(GigDraft),
    RegisterFreelancer(FreelancerDraft),
    SearchGigs(GigSearchQuery),
}

impl WizardPayload {
    /// Builds the payload for `kind` from collected answers.
    pub fn build(kind: WizardKind, collected: &Collected, numeric_fallback: f64) -> Self {
        match kind {
            WizardKind::PostGig => WizardPayload::CreateGig(gig_draft(collected, numeric_fallback)),
            WizardKind::RegisterFreelancer => {
                WizardPayload::RegisterFreelancer(freelancer_draft(collected))
            }
            WizardKind::FindGigs => WizardPayload::SearchGigs(search_query(collected)),
        }
    }
}

fn text(collected: &Collected, key: &str) -> String {
    collected
        .get(key)
        .and_then(FieldValue::as_text)
        .unwrap_or_default()
        .to_string()
}

fn number(collected: &Collected, key: &str, fallback: f64) -> f64 {
    collected
        .get(key)
        .and_then(FieldValue::as_f64)
        .unwrap_or(fallback)
}

fn flag(collected: &Collected, key: &str) -> bool {
    collected
        .get(key)
        .and_then(FieldValue::as_bool)
        .unwrap_or(false)
}

fn gig_draft(collected: &Collected, numeric_fallback: f64) -> GigDraft {
    let mut category = text(collected, "category");
    if category == "Other" {
        let custom = text(collected, "custom_category");
        if !custom.is_empty() {
            category = custom;
        }
    }

    let people_needed = collected
        .get("people_needed")
        .and_then(FieldValue::as_i64)
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(1);

    GigDraft {
        title: text(collected, "title"),
        description: text(collected, "description"),
        category,
        location: text(collected, "location"),
        budget_min: number(collected, "budget_min", numeric_fallback),
        budget_max: number(collected, "budget_max", numeric_fallback),
        duration_start: text(collected, "duration_start"),
        duration_end: text(collected, "duration_end"),
        people_needed,
        is_urgent: flag(collected, "is_urgent"),
    }
}

fn freelancer_draft(collected: &Collected) -> FreelancerDraft {
    FreelancerDraft {
        categories: collected
            .get("categories")
            .and_then(FieldValue::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default(),
        availability: text(collected, "availability"),
        location: text(collected, "location"),
        bio: text(collected, "bio"),
        hourly_rate: collected.get("hourly_rate").and_then(FieldValue::as_f64),
    }
}

fn search_query(collected: &Collected) -> GigSearchQuery {
    let category = collected
        .get("category")
        .and_then(FieldValue::as_text)
        .filter(|c| *c != ANY_CATEGORY)
        .map(str::to_string);
    let location = collected
        .get("location")
        .and_then(FieldValue::as_text)
        .map(str::to_string);
    // "No" means no urgency filter rather than "non-urgent only".
    let is_urgent = flag(collected, "urgent_only").then_some(true);

    GigSearchQuery {
        category,
        location,
        is_urgent,
    }
}
