//! Marketplace API configuration

use serde::Deserialize;
use std::time::Duration;

use crate::adapters::marketplace::MarketplaceClientConfig;
use crate::adapters::resilience::RetryPolicy;

use super::ai::is_http_url;
use super::error::ValidationError;

/// Marketplace REST API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    /// Base URL of the marketplace API, e.g. `https://api.careerplus.example/api`
    pub api_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Gigs returned by a wizard search
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl MarketplaceConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            search_limit: default_search_limit(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn client(&self) -> MarketplaceClientConfig {
        MarketplaceClientConfig::new(self.api_base_url.clone()).with_timeout(self.timeout())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.timeout(), self.max_retries)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("MARKETPLACE__API_BASE_URL"));
        }
        if !is_http_url(&self.api_base_url) {
            return Err(ValidationError::InvalidUrl("marketplace.api_base_url"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("marketplace"));
        }
        if !(1..=50).contains(&self.search_limit) {
            return Err(ValidationError::InvalidSearchLimit);
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    15
}

fn default_retries() -> u32 {
    1
}

fn default_search_limit() -> usize {
    5
}
