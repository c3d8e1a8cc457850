//! Caller context supplied by the host with every event.

use secrecy::Secret;
use serde::{Deserialize, Serialize};

/// What the host knows about the user at the time of an event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub is_freelancer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<String>,
    /// Bearer token forwarded to the marketplace. Never serialized or logged.
    #[serde(skip)]
    pub access_token: Option<Secret<String>>,
}

impl UserContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated() -> Self {
        Self {
            is_authenticated: true,
            ..Self::default()
        }
    }

    pub fn freelancer() -> Self {
        Self {
            is_authenticated: true,
            is_freelancer: true,
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.current_page = Some(page.into());
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(Secret::new(token.into()));
        self
    }
}
