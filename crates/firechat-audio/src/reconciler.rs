use std::collections::HashMap;

use firechat_types::TranscriptSegment;

/// Merges streaming partial-transcription updates into an ordered transcript.
///
/// Each segment id appears once in the display order, at the position of its
/// first insertion; later updates for the same id overwrite the text in
/// place. Segments are superseded, never removed. After [`finish`]
/// (the terminal sentinel) further updates are ignored.
///
/// [`finish`]: SegmentReconciler::finish
#[derive(Debug, Default)]
pub struct SegmentReconciler {
    order: Vec<String>,
    texts: HashMap<String, String>,
    finished: bool,
}

impl SegmentReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one server update, in segment order.
    pub fn apply_update(&mut self, segments: &[TranscriptSegment]) {
        if self.finished {
            return;
        }
        for segment in segments {
            if !self.texts.contains_key(&segment.id) {
                self.order.push(segment.id.clone());
            }
            self.texts.insert(segment.id.clone(), segment.text.clone());
        }
    }

    /// Latch the terminal state; the transcript is now immutable.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The ordered transcript view.
    pub fn transcript(&self) -> Vec<TranscriptSegment> {
        self.order
            .iter()
            .map(|id| TranscriptSegment {
                id: id.clone(),
                text: self.texts[id].clone(),
            })
            .collect()
    }

    /// The transcript as one displayable line.
    pub fn render(&self) -> String {
        self.order
            .iter()
            .map(|id| self.texts[id].as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
