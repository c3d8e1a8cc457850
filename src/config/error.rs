//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Invalid {0} timeout")]
    InvalidTimeout(&'static str),

    #[error("Request timeout of {configured_secs}s is shorter than the {needed_secs}s remote calls may take")]
    RequestTimeoutTooShort {
        configured_secs: u64,
        needed_secs: u64,
    },

    #[error("Session TTL must be positive")]
    InvalidSessionTtl,

    #[error("Temperature must be between 0 and 2")]
    InvalidTemperature,

    #[error("max_tokens must be positive")]
    InvalidMaxTokens,

    #[error("Invalid {0} URL: must start with http:// or https://")]
    InvalidUrl(&'static str),

    #[error("Search limit must be between 1 and 50")]
    InvalidSearchLimit,

    #[error("Context window must be between 1 and 30")]
    InvalidContextWindow,

    #[error("Numeric fallback must be a finite number")]
    InvalidNumericFallback,
}
