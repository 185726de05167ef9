use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use uuid::Uuid;

use firechat_api::{AssistantTurn, ModelClient};
use firechat_functions::{FunctionRegistry, FunctionValue, ResultKind};
use firechat_types::{Message, Role, ToolCall};

use crate::conversation::Conversation;
use crate::error::ChatError;
use crate::logger::ConversationLogger;

const DEFAULT_MAX_ROUNDS: usize = 8;

/// Drives a conversation to a final assistant answer, executing any tool
/// calls the model requests along the way.
///
/// Only one cycle can be in flight per conversation; `&mut self` on
/// [`submit_user_text`](Orchestrator::submit_user_text) enforces that.
pub struct Orchestrator {
    client: Arc<dyn ModelClient>,
    functions: Arc<FunctionRegistry>,
    conversation: Conversation,
    media_dir: PathBuf,
    logger: Option<ConversationLogger>,
    max_rounds: usize,
    quiet: bool,
}

/// Fluent construction for [`Orchestrator`].
pub struct OrchestratorBuilder {
    client: Arc<dyn ModelClient>,
    functions: Arc<FunctionRegistry>,
    conversation: Conversation,
    media_dir: PathBuf,
    logger: Option<ConversationLogger>,
    max_rounds: usize,
    quiet: bool,
}

impl OrchestratorBuilder {
    pub fn conversation(mut self, conversation: Conversation) -> Self {
        self.conversation = conversation;
        self
    }

    pub fn media_dir(mut self, media_dir: impl Into<PathBuf>) -> Self {
        self.media_dir = media_dir.into();
        self
    }

    pub fn logger(mut self, logger: ConversationLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Suppress per-call console status lines.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn build(self) -> Orchestrator {
        Orchestrator {
            client: self.client,
            functions: self.functions,
            conversation: self.conversation,
            media_dir: self.media_dir,
            logger: self.logger,
            max_rounds: self.max_rounds,
            quiet: self.quiet,
        }
    }
}

impl Orchestrator {
    pub fn builder(
        client: Arc<dyn ModelClient>,
        functions: Arc<FunctionRegistry>,
    ) -> OrchestratorBuilder {
        OrchestratorBuilder {
            client,
            functions,
            conversation: Conversation::default(),
            media_dir: PathBuf::from("media"),
            logger: None,
            max_rounds: DEFAULT_MAX_ROUNDS,
            quiet: false,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Drop the whole conversation (the "trash" recovery path).
    pub fn clear(&mut self) {
        self.conversation.clear();
    }

    /// Flush and close the transcript log, if one is attached.
    pub async fn shutdown(&mut self) {
        if let Some(logger) = &mut self.logger {
            logger.shutdown().await;
        }
    }

    /// Submit one user turn and drive it to a final assistant answer.
    ///
    /// On success the final answer is returned and appended as a non-hidden
    /// assistant message. On [`ChatError::Model`] for the first submission
    /// the user message is rolled back; tool failures and mid-round model
    /// errors also restore a consistent state (no tool-call assistant
    /// message is ever left without its tool response).
    pub async fn submit_user_text(&mut self, text: &str) -> Result<String, ChatError> {
        let baseline = self.conversation.len();

        let user_message = Message::user(text);
        self.log(&user_message).await;
        self.conversation.push(user_message);
        self.conversation.push(Message::loading_placeholder());

        let first = self.complete().await;
        // placeholder is observable UI state only; it never survives the call
        self.conversation.pop();
        let mut turn = match first {
            Ok(turn) => turn,
            Err(error) => {
                self.conversation.truncate(baseline);
                return Err(error.into());
            }
        };

        let mut rounds = 0usize;
        let mut last_round: Option<(Vec<ToolCall>, String)> = None;

        loop {
            let Some(tool_calls) = turn.tool_calls.clone().filter(|calls| !calls.is_empty()) else {
                // final answer: attach the last round's calls and output for
                // display, append, done
                let mut assistant = assistant_message(turn);
                if let Some((calls, response)) = last_round.take() {
                    assistant.metadata.function_calls =
                        calls.into_iter().map(|call| call.function).collect();
                    assistant.metadata.function_response = Some(response);
                }
                self.log(&assistant).await;
                let content = assistant.content.clone();
                self.conversation.push(assistant);
                return Ok(content);
            };

            if rounds >= self.max_rounds {
                self.conversation.truncate(baseline);
                return Err(ChatError::RoundLimit(self.max_rounds));
            }

            // the tool-call turn stays in API history but is not rendered
            let mut assistant = assistant_message(turn);
            assistant.metadata.hide = true;
            self.log(&assistant).await;
            self.conversation.push(assistant);

            let results = match self.execute_round(&tool_calls, rounds).await {
                Ok(results) => results,
                Err(error) => {
                    // no partial tool result; remove the dangling tool-call
                    // message so the turn can be resubmitted cleanly
                    self.conversation.pop();
                    return Err(error);
                }
            };

            let joined = results.join("\n");
            let tool_call_id = match tool_calls.as_slice() {
                [only] => Some(only.id.clone()),
                _ => None,
            };
            let tool_message = Message::tool(joined.clone(), tool_call_id);
            self.log(&tool_message).await;
            self.conversation.push(tool_message);
            last_round = Some((tool_calls, joined));
            rounds += 1;

            turn = match self.complete().await {
                Ok(turn) => turn,
                Err(error) => {
                    // restore the pre-turn state rather than strand a
                    // half-finished round
                    self.conversation.truncate(baseline);
                    return Err(error.into());
                }
            };
        }
    }

    async fn complete(&self) -> Result<AssistantTurn, firechat_api::ApiError> {
        let history = self.conversation.api_visible();
        let tools = self.functions.specs();
        self.client
            .complete(self.conversation.settings(), &history, &tools)
            .await
    }

    /// Execute every call of a round concurrently and join the results in
    /// call order.
    async fn execute_round(
        &self,
        tool_calls: &[ToolCall],
        round: usize,
    ) -> Result<Vec<String>, ChatError> {
        if !self.quiet {
            for call in tool_calls {
                println!(
                    "{} {} with args: {} (round {}/{})",
                    "🔧 Calling function:".yellow(),
                    call.function.name.cyan(),
                    call.function.arguments.bright_black(),
                    round + 1,
                    self.max_rounds
                );
            }
        }

        let results = futures::future::try_join_all(
            tool_calls.iter().map(|call| self.execute_call(call)),
        )
        .await?;

        if !self.quiet {
            for (call, result) in tool_calls.iter().zip(&results) {
                println!(
                    "{} {} => {}",
                    "📋 Result:".green(),
                    call.function.name.cyan(),
                    truncate_for_display(result).bright_black()
                );
            }
        }

        Ok(results)
    }

    async fn execute_call(&self, call: &ToolCall) -> Result<String, ChatError> {
        let name = &call.function.name;
        let value = self
            .functions
            .call(name, &call.function.arguments)
            .await
            .map_err(|source| ChatError::ToolExecution {
                name: name.clone(),
                source,
            })?;

        match (self.functions.result_kind(name), value) {
            (Some(ResultKind::BinaryImage), FunctionValue::Image(bytes)) => {
                self.store_image(bytes).await
            }
            (_, FunctionValue::Json(text)) => Ok(text),
            (_, FunctionValue::Image(_)) => Err(ChatError::ToolExecution {
                name: name.clone(),
                source: firechat_functions::FunctionError::UnexpectedResult {
                    name: name.clone(),
                    detail: "binary payload from a text-kind function".to_string(),
                },
            }),
        }
    }

    /// Persist a binary image result and hand back a displayable reference.
    async fn store_image(&self, bytes: Vec<u8>) -> Result<String, ChatError> {
        tokio::fs::create_dir_all(&self.media_dir).await?;
        let path = self.media_dir.join(format!("{}.png", Uuid::new_v4()));
        tokio::fs::write(&path, bytes).await?;
        Ok(serde_json::json!({ "image_url": path.display().to_string() }).to_string())
    }

    async fn log(&mut self, message: &Message) {
        if let Some(logger) = &mut self.logger {
            logger.log_message(message).await;
        }
    }
}

fn assistant_message(turn: AssistantTurn) -> Message {
    let mut message = Message::new(Role::Assistant, turn.content);
    message.id = turn.id;
    message.tool_calls = turn.tool_calls;
    message
}

fn truncate_for_display(result: &str) -> String {
    const LIMIT: usize = 200;
    if result.len() > LIMIT {
        let cut = result
            .char_indices()
            .take_while(|(index, _)| *index < LIMIT)
            .last()
            .map(|(index, ch)| index + ch.len_utf8())
            .unwrap_or(0);
        format!("{} (truncated)", &result[..cut])
    } else {
        result.to_string()
    }
}
