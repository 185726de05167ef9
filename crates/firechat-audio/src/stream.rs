use std::path::Path;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::error::AudioError;
use crate::protocol::{final_checkpoint_frame, parse_stream_message, StreamMessage};
use crate::reconciler::SegmentReconciler;
use crate::wav::{prepare_chunks, CHUNK_MS};

/// Default streaming speech-to-text endpoint.
pub const DEFAULT_STREAMING_ENDPOINT: &str =
    "wss://audio-streaming.us-virginia-1.direct.fireworks.ai/v1/audio/transcriptions/streaming";

const CHUNK_QUEUE_DEPTH: usize = 32;

/// Connection parameters for one streaming transcription.
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    pub endpoint: String,
    pub api_key: String,
    pub language: String,
}

impl TranscriptionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_STREAMING_ENDPOINT.to_string(),
            api_key: api_key.into(),
            language: "en".to_string(),
        }
    }

    fn request_url(&self) -> Result<Url, AudioError> {
        let mut url = Url::parse(&self.endpoint)?;
        url.query_pairs_mut().append_pair("language", &self.language);
        Ok(url)
    }
}

/// Stream a WAV file to the transcription endpoint.
///
/// Chunks are produced on a fixed cadence into a bounded queue and forwarded
/// as binary frames, followed by the end-of-audio checkpoint. Every server
/// update is merged into the reconciler and reported through `on_update`.
/// Returns when the final checkpoint echoes back or the socket closes.
pub async fn transcribe_file<F>(
    config: &TranscriptionConfig,
    path: &Path,
    mut on_update: F,
) -> Result<SegmentReconciler, AudioError>
where
    F: FnMut(&SegmentReconciler),
{
    let chunks = prepare_chunks(path)?;

    let url = config.request_url()?;
    let mut request = url.as_str().into_client_request()?;
    request.headers_mut().insert(
        "Authorization",
        HeaderValue::from_str(&format!("Bearer {}", config.api_key))?,
    );

    let (socket, _response) = connect_async(request).await?;
    let (mut writer, mut reader) = socket.split();

    // timed producer + bounded queue: chunks arrive at real-time cadence
    // even when the socket momentarily stalls
    let (chunk_tx, mut chunk_rx) = mpsc::channel::<Vec<u8>>(CHUNK_QUEUE_DEPTH);
    let producer = tokio::spawn(async move {
        let mut cadence = tokio::time::interval(Duration::from_millis(CHUNK_MS));
        for chunk in chunks {
            cadence.tick().await;
            if chunk_tx.send(chunk).await.is_err() {
                break;
            }
        }
    });

    let sender = tokio::spawn(async move {
        while let Some(chunk) = chunk_rx.recv().await {
            if writer.send(Message::Binary(chunk.into())).await.is_err() {
                return;
            }
        }
        let _ = writer
            .send(Message::Text(final_checkpoint_frame().into()))
            .await;
    });

    let mut reconciler = SegmentReconciler::new();
    let outcome = loop {
        let Some(frame) = reader.next().await else {
            break Ok(());
        };
        match frame {
            Ok(Message::Text(text)) => match parse_stream_message(&text) {
                Some(StreamMessage::Segments(segments)) => {
                    reconciler.apply_update(&segments);
                    on_update(&reconciler);
                }
                Some(StreamMessage::Final) => {
                    reconciler.finish();
                    break Ok(());
                }
                None => {
                    eprintln!("[transcribe] dropping malformed frame: {}", text);
                }
            },
            Ok(Message::Close(_)) => break Ok(()),
            Ok(_) => {}
            Err(error) => break Err(AudioError::WebSocket(error)),
        }
    };

    // closing the transport aborts any in-flight sends
    producer.abort();
    sender.abort();

    outcome.map(|_| reconciler)
}
