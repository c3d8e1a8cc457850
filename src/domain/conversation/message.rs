//! Message entity for conversations.
//!
//! Messages are immutable once appended to a session transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::actions::ActionToken;
use crate::domain::marketplace::GigSummary;
use crate::domain::wizard::StepInputSpec;

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One rendered entry in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    pub role: Role,
    /// May be empty for action-only or attachment-only messages.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_config: Option<StepInputSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionToken>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<GigSummary>,
    pub created_at: DateTime<Utc>,
}

impl ConversationMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            input_config: None,
            action: None,
            attachments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_input(mut self, spec: StepInputSpec) -> Self {
        self.input_config = Some(spec);
        self
    }

    pub fn with_action(mut self, action: ActionToken) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_optional_action(mut self, action: Option<ActionToken>) -> Self {
        self.action = action;
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<GigSummary>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_camel_case_and_skips_empty_parts() {
        let msg = ConversationMessage::assistant("Hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert!(json.get("inputConfig").is_none());
        assert!(json.get("attachments").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn blank_content_has_no_content() {
        assert!(!ConversationMessage::assistant("  ").has_content());
        assert!(ConversationMessage::user("x").has_content());
    }
}
