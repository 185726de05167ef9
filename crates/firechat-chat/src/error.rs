use firechat_api::ApiError;
use firechat_functions::FunctionError;
use thiserror::Error;

/// Failures during one orchestration cycle. None is fatal: every variant
/// leaves the conversation in a consistent state ready for resubmission.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The model endpoint returned an error payload. The triggering user
    /// message has been rolled back.
    #[error("model endpoint error: {0}")]
    Model(#[from] ApiError),

    /// A named function call failed. The round was aborted with no partial
    /// tool result appended.
    #[error("function '{name}' failed: {source}")]
    ToolExecution {
        name: String,
        #[source]
        source: FunctionError,
    },

    /// Writing a binary function result to the media directory failed.
    #[error("failed to store binary function result: {0}")]
    Media(#[from] std::io::Error),

    /// The model kept requesting tools past the round cap; the turn was
    /// rolled back.
    #[error("tool-call round limit ({0}) exceeded")]
    RoundLimit(usize),
}
