//! Mock Remote Assistant for testing.
//!
//! Provides a configurable implementation of the RemoteAssistant port so
//! tests and local runs never call a real model.
//!
//! # Features
//!
//! - Pre-configured replies, consumed in order
//! - Simulated latency for timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let assistant = MockAssistant::new()
//!     .with_response("Try pricing by the hour.")
//!     .with_error(AssistantError::network("reset"));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::actions::extract_action;
use crate::domain::conversation::{AssistantReply, AssistantRequest};
use crate::ports::{AssistantError, RemoteAssistant};

/// A configured mock outcome.
#[derive(Debug, Clone)]
enum MockReply {
    Reply(AssistantReply),
    Error(AssistantError),
}

/// Mock remote assistant.
#[derive(Debug, Clone)]
pub struct MockAssistant {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<AssistantRequest>>>,
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockAssistant {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a text reply. Action markers in the text are parsed the same
    /// way the real adapter parses them.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        let content = content.into();
        let action = extract_action(&content);
        self.with_reply(AssistantReply {
            response: content,
            action,
        })
    }

    /// Queues a fully specified reply.
    pub fn with_reply(self, reply: AssistantReply) -> Self {
        lock(&self.replies).push_back(MockReply::Reply(reply));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: AssistantError) -> Self {
        lock(&self.replies).push_back(MockReply::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<AssistantRequest> {
        lock(&self.calls).clone()
    }

    fn next_reply(&self) -> MockReply {
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| MockReply::Reply(AssistantReply::text("Mock response")))
    }
}

#[async_trait]
impl RemoteAssistant for MockAssistant {
    async fn chat(&self, request: AssistantRequest) -> Result<AssistantReply, AssistantError> {
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_reply() {
            MockReply::Reply(reply) => Ok(reply),
            MockReply::Error(err) => Err(err),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
