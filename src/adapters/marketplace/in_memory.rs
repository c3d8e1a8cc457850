//! In-Memory Marketplace - GigService and FreelancerService without a network.
//!
//! Used by tests and local development.
//! Gigs get sequential ids (`gig-1`, `gig-2`, ..). A failure can be injected
//! for the next call to exercise error paths.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::GigId;
use crate::domain::marketplace::{CreatedGig, FreelancerProfile, GigSummary};
use crate::domain::wizard::{FreelancerDraft, GigDraft, GigSearchQuery};
use crate::ports::{FreelancerService, GigService, MarketplaceError};

#[derive(Debug, Default)]
struct State {
    gigs: Vec<GigSummary>,
    freelancers: Vec<FreelancerProfile>,
    created: Vec<GigDraft>,
    registered: Vec<FreelancerDraft>,
    searches: Vec<GigSearchQuery>,
    bearers: Vec<Option<String>>,
    next_failure: Option<MarketplaceError>,
    next_id: u64,
}

/// In-memory marketplace
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketplace {
    state: Arc<RwLock<State>>,
}

impl InMemoryMarketplace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds listed gigs.
    pub async fn with_gigs(self, gigs: Vec<GigSummary>) -> Self {
        self.state.write().await.gigs.extend(gigs);
        self
    }

    /// Fails the next call with `error`.
    pub async fn fail_next_with(&self, error: MarketplaceError) {
        self.state.write().await.next_failure = Some(error);
    }

    pub async fn gig_count(&self) -> usize {
        self.state.read().await.gigs.len()
    }

    pub async fn freelancer_count(&self) -> usize {
        self.state.read().await.freelancers.len()
    }

    /// Drafts accepted or rejected by `create`, in call order.
    pub async fn created_drafts(&self) -> Vec<GigDraft> {
        self.state.read().await.created.clone()
    }

    pub async fn registered_drafts(&self) -> Vec<FreelancerDraft> {
        self.state.read().await.registered.clone()
    }

    pub async fn searches(&self) -> Vec<GigSearchQuery> {
        self.state.read().await.searches.clone()
    }

    /// Bearer tokens seen by every call, in call order.
    pub async fn bearers(&self) -> Vec<Option<String>> {
        self.state.read().await.bearers.clone()
    }

    pub async fn clear(&self) {
        *self.state.write().await = State::default();
    }
}

fn matches(gig: &GigSummary, query: &GigSearchQuery) -> bool {
    let category_ok = query
        .category
        .as_deref()
        .map_or(true, |c| gig.category.eq_ignore_ascii_case(c));
    let location_ok = query.location.as_deref().map_or(true, |l| {
        gig.location.to_lowercase().contains(&l.to_lowercase())
    });
    let urgent_ok = query.is_urgent.map_or(true, |u| gig.is_urgent == u);
    category_ok && location_ok && urgent_ok
}

#[async_trait]
impl GigService for InMemoryMarketplace {
    async fn create(
        &self,
        draft: &GigDraft,
        bearer: Option<&str>,
    ) -> Result<CreatedGig, MarketplaceError> {
        let mut state = self.state.write().await;
        state.created.push(draft.clone());
        state.bearers.push(bearer.map(str::to_string));
        if let Some(err) = state.next_failure.take() {
            return Err(err);
        }
        if draft.budget_max < draft.budget_min {
            return Err(MarketplaceError::rejected(
                422,
                "Maximum budget must not be lower than minimum budget",
            ));
        }

        state.next_id += 1;
        let id = GigId::new(format!("gig-{}", state.next_id))
            .map_err(|e| MarketplaceError::Parse(e.to_string()))?;
        state.gigs.push(GigSummary {
            id: id.clone(),
            title: draft.title.clone(),
            category: draft.category.clone(),
            location: draft.location.clone(),
            budget_min: draft.budget_min,
            budget_max: draft.budget_max,
            is_urgent: draft.is_urgent,
        });
        Ok(CreatedGig { id })
    }

    async fn search(
        &self,
        query: &GigSearchQuery,
        limit: usize,
        bearer: Option<&str>,
    ) -> Result<Vec<GigSummary>, MarketplaceError> {
        let mut state = self.state.write().await;
        state.searches.push(query.clone());
        state.bearers.push(bearer.map(str::to_string));
        if let Some(err) = state.next_failure.take() {
            return Err(err);
        }

        Ok(state
            .gigs
            .iter()
            .filter(|gig| matches(gig, query))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FreelancerService for InMemoryMarketplace {
    async fn register(
        &self,
        draft: &FreelancerDraft,
        bearer: Option<&str>,
    ) -> Result<Option<FreelancerProfile>, MarketplaceError> {
        let mut state = self.state.write().await;
        state.registered.push(draft.clone());
        state.bearers.push(bearer.map(str::to_string));
        if let Some(err) = state.next_failure.take() {
            return Err(err);
        }

        let profile = FreelancerProfile {
            id: Some(format!("freelancer-{}", state.freelancers.len() + 1)),
            categories: draft.categories.clone(),
            availability: Some(draft.availability.clone()),
            location: Some(draft.location.clone()),
            hourly_rate: draft.hourly_rate,
        };
        state.freelancers.push(profile.clone());
        Ok(Some(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gig(id: &str, category: &str, location: &str, urgent: bool) -> GigSummary {
        GigSummary {
            id: GigId::new(id).unwrap(),
            title: format!("{} gig", category),
            category: category.into(),
            location: location.into(),
            budget_min: 10.0,
            budget_max: 20.0,
            is_urgent: urgent,
        }
    }

    fn draft(min: f64, max: f64) -> GigDraft {
        GigDraft {
            title: "Tutor".into(),
            description: "Math tutoring".into(),
            category: "Tutoring".into(),
            location: "Dhaka".into(),
            budget_min: min,
            budget_max: max,
            duration_start: "2026-11-01".into(),
            duration_end: "2026-12-01".into(),
            people_needed: 1,
            is_urgent: true,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let market = InMemoryMarketplace::new();
        let a = market.create(&draft(10.0, 20.0), Some("t")).await.unwrap();
        let b = market.create(&draft(10.0, 20.0), None).await.unwrap();

        assert_eq!(a.id.as_str(), "gig-1");
        assert_eq!(b.id.as_str(), "gig-2");
        assert_eq!(market.gig_count().await, 2);
        assert_eq!(market.bearers().await, vec![Some("t".to_string()), None]);
    }

    #[tokio::test]
    async fn create_rejects_inverted_budget() {
        let market = InMemoryMarketplace::new();
        let err = market.create(&draft(50.0, 10.0), None).await.unwrap_err();

        assert!(matches!(err, MarketplaceError::Rejected { status: 422, .. }));
        assert_eq!(market.gig_count().await, 0);
    }

    #[tokio::test]
    async fn search_filters_and_limits() {
        let market = InMemoryMarketplace::new()
            .with_gigs(vec![
                gig("a", "Writing", "Dhaka North", false),
                gig("b", "writing", "Remote", true),
                gig("c", "Tutoring", "Dhaka", true),
                gig("d", "Writing", "dhaka", true),
            ])
            .await;

        let query = GigSearchQuery {
            category: Some("WRITING".into()),
            location: Some("dhaka".into()),
            is_urgent: None,
        };
        let found = market.search(&query, 5, None).await.unwrap();
        let ids: Vec<_> = found.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);

        let urgent = GigSearchQuery {
            is_urgent: Some(true),
            ..Default::default()
        };
        assert_eq!(market.search(&urgent, 2, None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let market = InMemoryMarketplace::new();
        market
            .fail_next_with(MarketplaceError::Unavailable("down".into()))
            .await;

        assert!(market.search(&GigSearchQuery::default(), 5, None).await.is_err());
        assert!(market.search(&GigSearchQuery::default(), 5, None).await.is_ok());
        assert_eq!(market.searches().await.len(), 2);
    }

    #[tokio::test]
    async fn register_returns_profile() {
        let market = InMemoryMarketplace::new();
        let draft = FreelancerDraft {
            categories: vec!["Writing".into(), "Tutoring".into()],
            availability: "Weekends".into(),
            location: "Remote".into(),
            bio: "Hi".into(),
            hourly_rate: Some(12.5),
        };

        let profile = market.register(&draft, Some("tok")).await.unwrap().unwrap();
        assert_eq!(profile.id.as_deref(), Some("freelancer-1"));
        assert_eq!(profile.categories.len(), 2);
        assert_eq!(market.freelancer_count().await, 1);
        assert_eq!(market.registered_drafts().await, vec![draft]);
    }
}
