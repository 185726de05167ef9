use thiserror::Error;

/// Failures talking to the model endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to model endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success response from the endpoint, with whatever error payload
    /// it returned.
    #[error("model endpoint returned {status}: {details}")]
    Endpoint { status: u16, details: String },

    #[error("could not decode model response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("model endpoint returned no choices")]
    EmptyResponse,
}
