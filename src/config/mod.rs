//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CAREER_PLUS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use career_plus_assistant::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod assistant;
mod error;
mod marketplace;
mod server;

pub use ai::AiConfig;
pub use assistant::AssistantConfig;
pub use error::{ConfigError, ValidationError};
pub use marketplace::MarketplaceConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;
use std::time::Duration;

use crate::application::AssistantServiceConfig;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote assistant configuration (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Marketplace REST API
    pub marketplace: MarketplaceConfig,

    /// Conversation engine tunables
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CAREER_PLUS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `CAREER_PLUS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CAREER_PLUS__AI__OPENAI_API_KEY=...` -> `ai.openai_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CAREER_PLUS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.marketplace.validate()?;
        self.assistant.validate()?;
        self.server.covers(self.remote_budget())?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Longest time a single request may spend on remote calls.
    pub fn remote_budget(&self) -> Duration {
        self.ai
            .retry_policy()
            .worst_case()
            .max(self.marketplace.retry_policy().worst_case())
    }

    /// Service tunables drawn from the `ai`, `marketplace` and `assistant` sections
    pub fn service(&self) -> AssistantServiceConfig {
        AssistantServiceConfig {
            engine: self.assistant.engine(),
            assistant_policy: self.ai.retry_policy(),
            marketplace_policy: self.marketplace.retry_policy(),
            search_limit: self.marketplace.search_limit,
            session_ttl: self.assistant.session_ttl(),
        }
    }
}
