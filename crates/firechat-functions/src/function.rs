use async_trait::async_trait;
use thiserror::Error;

/// How a function's result should be treated by the caller.
///
/// Declared per function instead of switching on hardcoded names: the
/// orchestrator consults the registry for the kind and converts binary
/// payloads into displayable references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// Opaque JSON text, fed back to the model verbatim.
    Text,
    /// Binary image payload, converted to an `image_url` reference.
    BinaryImage,
}

/// The payload a function invocation produced.
#[derive(Debug, Clone)]
pub enum FunctionValue {
    Json(String),
    Image(Vec<u8>),
}

/// Failures invoking a named function.
#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("function '{0}' is not registered")]
    Unknown(String),

    #[error("cannot parse arguments for '{name}': {source}")]
    BadArguments {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("'{name}' upstream returned {status}: {body}")]
    Upstream {
        name: String,
        status: u16,
        body: String,
    },

    #[error("'{name}' returned an unexpected payload: {detail}")]
    UnexpectedResult { name: String, detail: String },
}

/// An external function the model may invoke by name.
#[async_trait]
pub trait Function: Send + Sync {
    /// Name of the function (must be unique).
    fn name(&self) -> &str;

    /// Human-readable description surfaced to the model.
    fn description(&self) -> &str;

    /// JSON-schema parameter object (`{"type":"object","properties":...}`).
    fn parameters(&self) -> serde_json::Value;

    fn result_kind(&self) -> ResultKind {
        ResultKind::Text
    }

    /// Invoke with the model-provided serialized arguments.
    async fn call(&self, args: &str) -> Result<FunctionValue, FunctionError>;

    /// OpenAI-compatible function descriptor for the `tools` request field.
    fn spec(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": self.parameters(),
            }
        })
    }
}

/// Parse the serialized argument payload a tool call carries.
pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(
    name: &str,
    args: &str,
) -> Result<T, FunctionError> {
    serde_json::from_str(args).map_err(|source| FunctionError::BadArguments {
        name: name.to_string(),
        source,
    })
}
