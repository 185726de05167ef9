//! Core types shared across the firechat crates.
//!
//! Wire-facing structures (`ToolCall`, `FunctionCall`, `TranscriptSegment`)
//! mirror the platform's OpenAI-compatible JSON. `Message` is the client-side
//! conversation turn; its `metadata` never leaves the process.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Roles and messages
// ============================================================================

/// Speaker of a conversation turn, serialized lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-side flags and display attachments for a message.
///
/// `loading` marks the placeholder assistant bubble while a request is in
/// flight; it is excluded from the history sent to the model. `hide` marks
/// intermediate tool-call messages that stay in the API-visible history but
/// are not rendered as answers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageMetadata {
    pub loading: bool,
    pub hide: bool,
    /// The function calls invoked during the last tool round, for display.
    pub function_calls: Vec<FunctionCall>,
    /// The joined output of the last tool round, for display.
    pub function_response: Option<String>,
}

/// One turn in a conversation.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Set on tool messages: the tool call this message answers.
    pub tool_call_id: Option<String>,
    /// Set on assistant messages that request tool invocations.
    pub tool_calls: Option<Vec<ToolCall>>,
    pub metadata: MessageMetadata,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            tool_call_id: None,
            tool_calls: None,
            metadata: MessageMetadata::default(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Empty assistant bubble shown while a model response is pending.
    pub fn loading_placeholder() -> Self {
        let mut message = Self::new(Role::Assistant, "");
        message.metadata.loading = true;
        message
    }

    /// Synthesized answer to a tool round.
    pub fn tool(content: impl Into<String>, tool_call_id: Option<String>) -> Self {
        let mut message = Self::new(Role::Tool, content);
        message.tool_call_id = tool_call_id;
        message.metadata.hide = true;
        message
    }

    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }
}

// ============================================================================
// Tool calls
// ============================================================================

/// A model-issued request to invoke a named function. Never produced by the
/// client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_tool_type")]
    pub tool_type: String,
    pub function: FunctionCall,
}

fn default_tool_type() -> String {
    "function".to_string()
}

/// The function name and serialized JSON arguments inside a tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

// ============================================================================
// Request settings
// ============================================================================

/// Behavior when the conversation exceeds the model context window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextLengthBehavior {
    Truncate,
    Error,
}

/// Sampling and request knobs sent with every chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub stop: Vec<String>,
    pub context_length_exceeded_behavior: ContextLengthBehavior,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 1024,
            top_p: 1.0,
            top_k: 50,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            stop: Vec::new(),
            context_length_exceeded_behavior: ContextLengthBehavior::Truncate,
        }
    }
}

// ============================================================================
// Transcription
// ============================================================================

/// An identified, independently updatable span of a streaming transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptSegment {
    pub id: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(serde_json::from_str::<Role>("\"tool\"").unwrap(), Role::Tool);
    }

    #[test]
    fn test_tool_call_wire_shape() {
        let json = r#"{"id":"call_1","type":"function","function":{"name":"stock_quote","arguments":"{\"symbol\":\"AAPL\"}"}}"#;
        let call: ToolCall = serde_json::from_str(json).unwrap();
        assert_eq!(call.tool_type, "function");
        assert_eq!(call.function.name, "stock_quote");

        // "type" defaults when a backend omits it
        let bare: ToolCall =
            serde_json::from_str(r#"{"id":"c","function":{"name":"f","arguments":"{}"}}"#).unwrap();
        assert_eq!(bare.tool_type, "function");
    }

    #[test]
    fn test_tool_message_is_hidden() {
        let message = Message::tool("result", Some("call_1".to_string()));
        assert_eq!(message.role, Role::Tool);
        assert!(message.metadata.hide);
        assert_eq!(message.tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = ChatSettings::default();
        assert_eq!(settings.temperature, 0.0);
        assert_eq!(settings.max_tokens, 1024);
        assert_eq!(
            settings.context_length_exceeded_behavior,
            ContextLengthBehavior::Truncate
        );
        // empty stop list is omitted from the wire
        let body = serde_json::to_value(&settings).unwrap();
        assert!(body.get("stop").is_none());
    }
}
