//! Conversation state and the tool-call orchestration loop.
//!
//! [`Orchestrator::submit_user_text`] drives one user turn to a final
//! assistant answer, transparently executing any tool calls the model
//! requests along the way.

mod conversation;
mod error;
mod logger;
mod orchestrator;

pub use conversation::Conversation;
pub use error::ChatError;
pub use logger::ConversationLogger;
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
