//! Marketplace Ports - gig and freelancer services the wizards submit to.
//!
//! Both services belong to the marketplace REST API. Calls carry the
//! caller's bearer token, if any, so the marketplace can authorize them.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::marketplace::{CreatedGig, FreelancerProfile, GigSummary};
use crate::domain::wizard::{FreelancerDraft, GigDraft, GigSearchQuery};

/// Gig creation and search.
#[async_trait]
pub trait GigService: Send + Sync {
    async fn create(
        &self,
        draft: &GigDraft,
        bearer: Option<&str>,
    ) -> Result<CreatedGig, MarketplaceError>;

    async fn search(
        &self,
        query: &GigSearchQuery,
        limit: usize,
        bearer: Option<&str>,
    ) -> Result<Vec<GigSummary>, MarketplaceError>;
}

/// Freelancer registration.
#[async_trait]
pub trait FreelancerService: Send + Sync {
    /// The marketplace may accept a registration without echoing the
    /// profile back; that is `Ok(None)`.
    async fn register(
        &self,
        draft: &FreelancerDraft,
        bearer: Option<&str>,
    ) -> Result<Option<FreelancerProfile>, MarketplaceError>;
}

/// Marketplace call failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketplaceError {
    /// The marketplace refused the payload; `detail` is user-presentable.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("not signed in or session expired")]
    Unauthorized,

    #[error("marketplace unavailable: {0}")]
    Unavailable(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl MarketplaceError {
    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            detail: detail.into(),
        }
    }

    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MarketplaceError::Unavailable(_)
                | MarketplaceError::Network(_)
                | MarketplaceError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_detail_only() {
        let err = MarketplaceError::rejected(400, "Budget max must exceed budget min");
        assert_eq!(err.to_string(), "Budget max must exceed budget min");
        assert!(!err.is_retryable());
    }

    #[test]
    fn transport_errors_are_retryable() {
        assert!(MarketplaceError::Network("reset".into()).is_retryable());
        assert!(MarketplaceError::timeout(15).is_retryable());
        assert!(!MarketplaceError::Unauthorized.is_retryable());
    }
}
