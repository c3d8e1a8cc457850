//! HTTP Marketplace Client - GigService and FreelancerService over the
//! marketplace REST API.
//!
//! | Operation | Request | Response body |
//! |-----------|---------|---------------|
//! | create gig | `POST {base}/gigs` | `{ "gig": { "id": .. } }` |
//! | search gigs | `GET {base}/gigs?category=&location=&is_urgent=&limit=` | `{ "gigs": [..] }` |
//! | register freelancer | `POST {base}/freelancer/register` | `{ "profile": {..} \| null }` |
//!
//! Error bodies carry a `detail` field that is shown to the user verbatim.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::marketplace::{CreatedGig, FreelancerProfile, GigSummary};
use crate::domain::wizard::{FreelancerDraft, GigDraft, GigSearchQuery};
use crate::ports::{FreelancerService, GigService, MarketplaceError};

/// Marketplace client settings.
#[derive(Debug, Clone)]
pub struct MarketplaceClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl MarketplaceClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct CreateGigResponse {
    gig: CreatedGig,
}

#[derive(Debug, Deserialize)]
struct SearchGigsResponse {
    #[serde(default)]
    gigs: Vec<GigSummary>,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    profile: Option<FreelancerProfile>,
}

/// Client for the marketplace REST API.
#[derive(Debug, Clone)]
pub struct HttpMarketplaceClient {
    config: MarketplaceClientConfig,
    client: Client,
}

impl HttpMarketplaceClient {
    pub fn new(config: MarketplaceClientConfig) -> Result<Self, MarketplaceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MarketplaceError::Network(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        bearer: Option<&str>,
    ) -> Result<T, MarketplaceError> {
        let request = match bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MarketplaceError::timeout(self.config.timeout.as_secs())
            } else {
                MarketplaceError::Network(e.to_string())
            }
        })?;

        let response = handle_response_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| MarketplaceError::Parse(e.to_string()))
    }
}

async fn handle_response_status(response: Response) -> Result<Response, MarketplaceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(map_error_status(status.as_u16(), &body))
}

/// Maps a non-success status and its body to a marketplace error.
fn map_error_status(status: u16, body: &str) -> MarketplaceError {
    match status {
        401 | 403 => MarketplaceError::Unauthorized,
        500..=599 => MarketplaceError::Unavailable(format!("HTTP {}", status)),
        _ => MarketplaceError::rejected(status, error_detail(body)),
    }
}

/// `detail` from a JSON error body. Non-string details are rendered as JSON,
/// and bodies without one fall back to the raw text.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => match json.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        Err(_) if body.trim().is_empty() => "Request rejected".to_string(),
        Err(_) => body.to_string(),
    }
}

fn search_params(query: &GigSearchQuery, limit: usize) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(category) = &query.category {
        params.push(("category", category.clone()));
    }
    if let Some(location) = &query.location {
        params.push(("location", location.clone()));
    }
    if let Some(urgent) = query.is_urgent {
        params.push(("is_urgent", urgent.to_string()));
    }
    params.push(("limit", limit.to_string()));
    params
}

#[async_trait]
impl GigService for HttpMarketplaceClient {
    async fn create(
        &self,
        draft: &GigDraft,
        bearer: Option<&str>,
    ) -> Result<CreatedGig, MarketplaceError> {
        let request = self.client.post(self.url("/gigs")).json(draft);
        let body: CreateGigResponse = self.send(request, bearer).await?;
        tracing::debug!(gig_id = %body.gig.id, "gig created");
        Ok(body.gig)
    }

    async fn search(
        &self,
        query: &GigSearchQuery,
        limit: usize,
        bearer: Option<&str>,
    ) -> Result<Vec<GigSummary>, MarketplaceError> {
        let request = self
            .client
            .get(self.url("/gigs"))
            .query(&search_params(query, limit));
        let body: SearchGigsResponse = self.send(request, bearer).await?;
        Ok(body.gigs.into_iter().take(limit).collect())
    }
}

#[async_trait]
impl FreelancerService for HttpMarketplaceClient {
    async fn register(
        &self,
        draft: &FreelancerDraft,
        bearer: Option<&str>,
    ) -> Result<Option<FreelancerProfile>, MarketplaceError> {
        let request = self.client.post(self.url("/freelancer/register")).json(draft);
        let body: RegisterResponse = self.send(request, bearer).await?;
        if body.profile.is_none() {
            tracing::debug!("registration accepted without a profile");
        }
        Ok(body.profile)
    }
}
