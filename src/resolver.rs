// WHY: Maps a cursor offset onto exactly one sentence span
// Pure function of (spans, cursor); absence is a value, never an error

use tracing::trace;

use crate::segmenter::{self, Segmenter};
use crate::span::TextSpan;

/// Pick the sentence a cursor is inside, or the next sentence it precedes
///
/// Scans `spans` in order and returns the first span whose `end >= cursor`.
/// A cursor past every span resolves to the last span. Returns `None` only
/// when `spans` is empty.
pub fn resolve_span_at_cursor(spans: &[TextSpan], cursor: usize) -> Option<TextSpan> {
    let selected = spans
        .iter()
        .find(|span| span.end >= cursor)
        .or_else(|| spans.last())
        .copied();

    trace!(cursor, ?selected, "Resolved span at cursor");
    selected
}

/// Segment `text` with the default rules and resolve the span at `cursor`
pub fn span_of_sentence_at_cursor(text: &str, cursor: usize) -> Option<TextSpan> {
    resolve_span_at_cursor(&segmenter::segment(text), cursor)
}

/// A segmentation strategy paired with cursor resolution
#[derive(Debug, Clone)]
pub struct SentenceSelector<S> {
    segmenter: S,
}

impl<S: Segmenter> SentenceSelector<S> {
    pub fn new(segmenter: S) -> Self {
        Self { segmenter }
    }

    /// Span of the sentence at `cursor` in `text`
    pub fn span_at_cursor(&self, text: &str, cursor: usize) -> Option<TextSpan> {
        resolve_span_at_cursor(&self.segmenter.segment(text), cursor)
    }

    /// Text of the sentence at `cursor`, borrowed from `text`
    pub fn sentence_at_cursor<'a>(&self, text: &'a str, cursor: usize) -> Option<(TextSpan, &'a str)> {
        let span = self.span_at_cursor(text, cursor)?;
        span.slice(text).map(|sentence| (span, sentence))
    }
}

impl Default for SentenceSelector<&'static segmenter::RuleSegmenter> {
    fn default() -> Self {
        Self::new(segmenter::default_segmenter())
    }
}
