//! Timeout and retry around remote calls.
//!
//! Every attempt is bounded by `tokio::time::timeout`. A timeout or a
//! retryable error is retried up to `max_retries` more times with a fixed
//! backoff between attempts; anything else is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::ports::{AssistantError, MarketplaceError};

/// Errors that know whether a retry could help.
pub trait Retryable: Sized {
    fn is_retryable(&self) -> bool;

    /// The error reported when an attempt exceeds its deadline.
    fn timed_out(timeout: Duration) -> Self;
}

impl Retryable for AssistantError {
    fn is_retryable(&self) -> bool {
        AssistantError::is_retryable(self)
    }

    fn timed_out(timeout: Duration) -> Self {
        AssistantError::timeout(timeout.as_secs())
    }
}

impl Retryable for MarketplaceError {
    fn is_retryable(&self) -> bool {
        MarketplaceError::is_retryable(self)
    }

    fn timed_out(timeout: Duration) -> Self {
        MarketplaceError::timeout(timeout.as_secs())
    }
}

/// How a remote call is bounded and retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, max_retries: u32) -> Self {
        Self {
            timeout,
            max_retries,
            backoff: Duration::from_millis(250),
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Longest a call can take when every attempt times out.
    pub fn worst_case(&self) -> Duration {
        self.timeout * (self.max_retries + 1) + self.backoff * self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(30), 1)
    }
}

/// Runs `op` under `policy`. `op` is called once per attempt.
pub async fn with_timeout_and_retry<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    E: Retryable + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let err = match tokio::time::timeout(policy.timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) if !err.is_retryable() => return Err(err),
            Ok(Err(err)) => err,
            Err(_) => E::timed_out(policy.timeout),
        };

        if attempt > policy.max_retries {
            return Err(err);
        }

        tracing::warn!(attempt, error = %err, "remote call failed, retrying");
        if !policy.backoff.is_zero() {
            tokio::time::sleep(policy.backoff).await;
        }
    }
}
