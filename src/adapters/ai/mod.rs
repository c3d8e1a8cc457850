//! Remote assistant adapters.
//!
//! - `OpenAIAssistant` - chat completions API
//! - `MockAssistant` - queued replies for tests and offline runs

mod mock_assistant;
mod openai_assistant;

pub use mock_assistant::MockAssistant;
pub use openai_assistant::{system_prompt, OpenAIAssistant, OpenAIConfig};
