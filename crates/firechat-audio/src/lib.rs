//! Streaming speech-to-text: WAV preparation, the websocket client, and the
//! reconciler that merges partial segment updates into an ordered transcript.

mod error;
mod protocol;
mod reconciler;
mod stream;
mod wav;

pub use error::AudioError;
pub use protocol::{
    final_checkpoint_frame, parse_stream_message, StreamMessage, FINAL_CHECKPOINT_ID,
};
pub use reconciler::SegmentReconciler;
pub use stream::{transcribe_file, TranscriptionConfig, DEFAULT_STREAMING_ENDPOINT};
pub use wav::{decode_wav, pcm16_chunks, prepare_chunks, resample_linear, TARGET_SAMPLE_RATE};
