use thiserror::Error;

/// Failures preparing audio or talking to the streaming endpoint.
///
/// Malformed server frames are not represented here: they are dropped by
/// the read loop without interrupting the stream.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("could not read WAV file: {0}")]
    Wav(#[from] hound::Error),

    #[error("audio file contains no samples")]
    EmptyAudio,

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("API key is not a valid header value: {0}")]
    ApiKey(#[from] tokio_tungstenite::tungstenite::http::header::InvalidHeaderValue),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}
