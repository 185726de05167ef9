use serde::Deserialize;

use firechat_types::TranscriptSegment;

/// Checkpoint id marking end of audio; sent by the client after the last
/// chunk and echoed back by the server when everything before it has been
/// transcribed.
pub const FINAL_CHECKPOINT_ID: &str = "final";

/// One parsed server text frame.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamMessage {
    /// Partial transcription update.
    Segments(Vec<TranscriptSegment>),
    /// The final checkpoint echo; the stream is complete.
    Final,
}

#[derive(Deserialize)]
struct ServerFrame {
    #[serde(default)]
    checkpoint_id: Option<String>,
    #[serde(default)]
    segments: Option<Vec<TranscriptSegment>>,
}

/// The end-of-audio checkpoint frame the client sends.
pub fn final_checkpoint_frame() -> String {
    serde_json::json!({ "checkpoint_id": FINAL_CHECKPOINT_ID }).to_string()
}

/// Parse a server text frame. Returns `None` for anything malformed or
/// unrecognized; such frames are dropped without touching reconciler state.
pub fn parse_stream_message(text: &str) -> Option<StreamMessage> {
    let frame: ServerFrame = serde_json::from_str(text).ok()?;
    if frame.checkpoint_id.as_deref() == Some(FINAL_CHECKPOINT_ID) {
        return Some(StreamMessage::Final);
    }
    frame.segments.map(StreamMessage::Segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments_frame() {
        let parsed =
            parse_stream_message(r#"{"segments":[{"id":"0","text":"hello"}]}"#).unwrap();
        let StreamMessage::Segments(segments) = parsed else {
            panic!("expected segments");
        };
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].id, "0");
        assert_eq!(segments[0].text, "hello");
    }

    #[test]
    fn test_parse_final_checkpoint() {
        assert_eq!(
            parse_stream_message(r#"{"checkpoint_id":"final"}"#),
            Some(StreamMessage::Final)
        );
        // other checkpoints are not terminal
        assert_eq!(parse_stream_message(r#"{"checkpoint_id":"42"}"#), None);
    }

    #[test]
    fn test_malformed_frames_are_dropped() {
        assert_eq!(parse_stream_message("not json"), None);
        assert_eq!(parse_stream_message("{}"), None);
        assert_eq!(parse_stream_message(r#"{"segments":"oops"}"#), None);
        assert_eq!(parse_stream_message(r#"{"segments":[{"id":"0"}]}"#), None);
    }

    #[test]
    fn test_final_checkpoint_frame_round_trips() {
        assert_eq!(
            parse_stream_message(&final_checkpoint_frame()),
            Some(StreamMessage::Final)
        );
    }
}
