//! Chat-completion client for the Fireworks inference API.
//!
//! The model endpoint speaks the OpenAI-compatible wire format; this crate
//! maps the client-side conversation onto it and reshapes the response into
//! an [`AssistantTurn`] the orchestrator can act on.

mod client;
mod error;
mod wire;

pub use client::HttpModelClient;
pub use error::ApiError;
pub use wire::{ChatResponse, Choice, ResponseMessage, Usage};

use async_trait::async_trait;
use firechat_types::{ChatSettings, Message, ToolCall};

/// Default chat-completions endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.fireworks.ai/inference/v1";

/// One model response: either a final answer or a request for tool calls.
#[derive(Debug, Clone)]
pub struct AssistantTurn {
    pub id: String,
    pub content: String,
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl AssistantTurn {
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }
}

/// The model endpoint as the orchestrator sees it: messages in, one
/// assistant turn (or an error) out.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(
        &self,
        settings: &ChatSettings,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> Result<AssistantTurn, ApiError>;
}
