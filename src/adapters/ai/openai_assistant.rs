//! OpenAI Assistant - RemoteAssistant over the chat completions API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_temperature(0.7);
//!
//! let assistant = OpenAIAssistant::new(config)?;
//! ```
//!
//! One HTTP attempt per call. Timeouts and retries are applied by the caller
//! through `adapters::resilience`.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::actions::extract_action;
use crate::domain::conversation::{AssistantContext, AssistantReply, AssistantRequest, Role};
use crate::domain::wizard::GIG_CATEGORIES;
use crate::ports::{AssistantError, RemoteAssistant};

const SYSTEM_PROMPT: &str = "You are the Career Plus AI Assistant, a friendly guide for students and young professionals on a gig marketplace.

Personality: energetic, supportive and efficient. Casual but professional. Be encouraging!

You can help with:
1. Finding gigs: ask about skills, location and availability
2. Posting gigs: title, description, budget and duration
3. Profile setup
4. How the platform works: matching, ratings, applications
5. General freelancing advice: pricing, communication

Rules:
- Never modify data yourself. Suggest actions for the user to confirm.
- Keep answers short and helpful. Emojis sparingly.
- When the user wants to do something, include a structured action suggestion:
  a line with [ACTION_TYPE] followed by `Key: value` lines.

Action types: SEARCH_GIGS, POST_GIG, UPDATE_PROFILE, APPLY_GIG, REGISTER_FREELANCER

Example:
User: I want to find web dev gigs in Dhaka
You: I'll look for web development gigs in Dhaka!

[SEARCH_GIGS]
Category: Web Development
Location: Dhaka

Should I search with these filters?";

/// Configuration for the OpenAI assistant.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl OpenAIConfig {
    /// Creates a configuration with the defaults used in production.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Persona, marker convention and category list. Identical for every call.
static BASE_PROMPT: Lazy<String> = Lazy::new(|| {
    format!(
        "{}\n\nAvailable gig categories: {}",
        SYSTEM_PROMPT,
        GIG_CATEGORIES.join(", ")
    )
});

/// Builds the system prompt, including the caller's context.
pub fn system_prompt(context: &AssistantContext) -> String {
    let mut prompt = BASE_PROMPT.clone();

    prompt.push_str(&format!("\n\nReply in a {} tone.", context.tone));
    if let Some(page) = &context.current_page {
        prompt.push_str(&format!("\nUser is on: {}", page));
    }
    prompt.push_str(if context.is_authenticated {
        "\nUser is signed in."
    } else {
        "\nUser is not signed in."
    });
    if context.is_freelancer {
        prompt.push_str("\nUser is a registered freelancer.");
    }
    prompt
}

/// OpenAI-backed remote assistant.
pub struct OpenAIAssistant {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIAssistant {
    pub fn new(config: OpenAIConfig) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssistantError::InvalidRequest(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// System prompt, then the bounded history, then the new message.
    fn to_openai_request(&self, request: &AssistantRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(request.context.history.len() + 2);
        messages.push(OpenAIMessage {
            role: "system".to_string(),
            content: system_prompt(&request.context),
        });

        for entry in &request.context.history {
            messages.push(OpenAIMessage {
                role: match entry.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                }
                .to_string(),
                content: entry.content.clone(),
            });
        }

        messages.push(OpenAIMessage {
            role: "user".to_string(),
            content: request.message.clone(),
        });

        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    async fn send_request(&self, request: &AssistantRequest) -> Result<Response, AssistantError> {
        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&self.to_openai_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AssistantError::timeout(self.config.timeout.as_secs())
                } else if e.is_connect() {
                    AssistantError::network(format!("Connection failed: {}", e))
                } else {
                    AssistantError::network(e.to_string())
                }
            })
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, AssistantError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(map_error_status(status.as_u16(), error_body))
    }

    async fn parse_response(&self, response: Response) -> Result<String, AssistantError> {
        let response = self.handle_response_status(response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::parse(format!("Failed to parse response: {}", e)))?;

        openai_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AssistantError::parse("No choices in response"))
    }
}

fn map_error_status(status: u16, error_body: String) -> AssistantError {
    match status {
        401 => AssistantError::AuthenticationFailed,
        429 => AssistantError::rate_limited(parse_retry_after(&error_body)),
        500..=599 => AssistantError::unavailable(format!("Server error {}: {}", status, error_body)),
        _ => AssistantError::InvalidRequest(format!("Status {}: {}", status, error_body)),
    }
}

/// Reads "try again in Ns" from an OpenAI error body, defaulting to 30s.
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|parsed| {
            let message = parsed.get("error")?.get("message")?.as_str()?.to_string();
            let idx = message.find("try again in ")?;
            let digits: String = message[idx + 13..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse::<u32>().ok()
        })
        .unwrap_or(30)
}

#[async_trait]
impl RemoteAssistant for OpenAIAssistant {
    async fn chat(&self, request: AssistantRequest) -> Result<AssistantReply, AssistantError> {
        let response = self.send_request(&request).await?;
        let content = self.parse_response(response).await?;

        tracing::debug!(
            model = %self.config.model,
            history = request.context.history.len(),
            "assistant replied"
        );

        let action = extract_action(&content);
        Ok(AssistantReply {
            response: content,
            action,
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}
