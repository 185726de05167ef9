use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use firechat_types::{ChatSettings, Message};

use crate::error::ApiError;
use crate::wire::{ChatResponse, WireMessage};
use crate::{AssistantTurn, ModelClient};

/// HTTP client for the chat-completions endpoint.
pub struct HttpModelClient {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl HttpModelClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            api_key,
            base_url,
            model,
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Assemble the request body: settings, model, a dated system prompt,
    /// the mapped history, and the available function specs.
    fn build_request_body(
        &self,
        settings: &ChatSettings,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> serde_json::Value {
        let system_message = json!({
            "role": "system",
            "content": format!(
                "You are a helpful assistant with access to functions. Use them if needed. \
                 If a function is not available, do not make one up. The date and time is {}.",
                Utc::now().to_rfc2822()
            ),
        });

        let mut wire_messages = vec![system_message];
        for message in messages {
            // serializing a WireMessage cannot fail
            wire_messages.push(
                serde_json::to_value(WireMessage::from(message)).unwrap_or_default(),
            );
        }

        let mut object = match serde_json::to_value(settings) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        object.insert("model".to_string(), json!(self.model));
        object.insert("stream".to_string(), json!(false));
        object.insert("n".to_string(), json!(1));
        object.insert("messages".to_string(), serde_json::Value::Array(wire_messages));
        object.insert("tools".to_string(), json!(tools));
        serde_json::Value::Object(object)
    }

    fn into_turn(response: ChatResponse) -> Result<AssistantTurn, ApiError> {
        let choice = response.choices.into_iter().next().ok_or(ApiError::EmptyResponse)?;
        Ok(AssistantTurn {
            id: response.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            content: choice.message.content,
            tool_calls: choice.message.tool_calls,
        })
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn complete(
        &self,
        settings: &ChatSettings,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> Result<AssistantTurn, ApiError> {
        let body = self.build_request_body(settings, messages, tools);

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(ApiError::Endpoint {
                status: status.as_u16(),
                details,
            });
        }

        let text = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&text)?;
        Self::into_turn(parsed)
    }
}
