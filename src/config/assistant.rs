//! Conversation engine tunables

use serde::Deserialize;
use std::time::Duration;

use crate::domain::conversation::{EngineConfig, MAX_CONTEXT_ENTRIES};

use super::error::ValidationError;

/// Conversation engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Context entries sent to the remote assistant
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Stored when a numeric wizard answer does not parse
    #[serde(default = "default_numeric_fallback")]
    pub numeric_fallback: f64,

    /// Sessions untouched for this long are expired, closed ones included
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

impl AssistantConfig {
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            context_window: self.context_window,
            numeric_fallback: self.numeric_fallback,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=MAX_CONTEXT_ENTRIES).contains(&self.context_window) {
            return Err(ValidationError::InvalidContextWindow);
        }
        if !self.numeric_fallback.is_finite() {
            return Err(ValidationError::InvalidNumericFallback);
        }
        if self.session_ttl_secs == 0 {
            return Err(ValidationError::InvalidSessionTtl);
        }
        Ok(())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            context_window: default_context_window(),
            numeric_fallback: default_numeric_fallback(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

fn default_context_window() -> usize {
    MAX_CONTEXT_ENTRIES
}

fn default_numeric_fallback() -> f64 {
    1.0
}

fn default_session_ttl() -> u64 {
    30 * 60
}
