//! Bounded context window sent to the remote assistant.
//!
//! The transcript is unbounded and render-only; the context window keeps the
//! trailing slice of it, dropping the oldest entries first.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::message::{ConversationMessage, Role};

/// Hard ceiling on context entries.
pub const MAX_CONTEXT_ENTRIES: usize = 30;

/// Role and content only; what the remote model sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub role: Role,
    pub content: String,
}

impl ContextEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&ConversationMessage> for ContextEntry {
    fn from(message: &ConversationMessage) -> Self {
        Self::new(message.role, message.content.clone())
    }
}

/// FIFO of context entries with a fixed capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextWindow {
    entries: VecDeque<ContextEntry>,
    capacity: usize,
}

impl ContextWindow {
    /// Capacity is clamped to `1..=MAX_CONTEXT_ENTRIES`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_CONTEXT_ENTRIES);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: ContextEntry) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter()
    }

    /// Owned copy, oldest first.
    pub fn to_vec(&self) -> Vec<ContextEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self::new(MAX_CONTEXT_ENTRIES)
    }
}
