// WHY: Offset types shared by the segmenter, resolver and session
// Public offsets count chars; byte positions never leave the crate

use serde::{Deserialize, Serialize};

/// 0-based byte position in source text
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub(crate) struct BytePos(pub usize);

impl BytePos {
    pub(crate) fn new(pos: usize) -> Self {
        BytePos(pos)
    }

    pub(crate) fn advance(&self, offset: usize) -> Self {
        BytePos(self.0 + offset)
    }
}

/// Half-open `[start, end)` interval of char offsets denoting one sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    /// Build a span, ordering the pair so `start <= end` always holds
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `offset` lies inside the span or on its end boundary
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset <= self.end
    }

    /// Text this span denotes in `text`, or `None` if the span does not fit
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = char_to_byte(text, self.start)?;
        let end = char_to_byte(text, self.end)?;
        text.get(start..end)
    }
}

/// Byte index of the `char_offset`-th char, allowing one-past-the-end
pub(crate) fn char_to_byte(text: &str, char_offset: usize) -> Option<usize> {
    if char_offset == 0 {
        return Some(0);
    }
    text.char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .nth(char_offset)
}

/// Number of chars in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Replace the chars covered by `span` with `replacement`
///
/// Returns `None` when the span does not fit inside `text`.
pub fn splice(text: &str, span: TextSpan, replacement: &str) -> Option<String> {
    let start = char_to_byte(text, span.start)?;
    let end = char_to_byte(text, span.end)?;

    let mut result = String::with_capacity(text.len() - (end - start) + replacement.len());
    result.push_str(&text[..start]);
    result.push_str(replacement);
    result.push_str(&text[end..]);
    Some(result)
}

/// Forward-only byte to char offset conversion
/// WHY: Spans arrive in ascending byte order, so one pass over the text suffices
#[derive(Debug)]
pub(crate) struct PositionTracker<'a> {
    text_bytes: &'a [u8],
    current_byte_pos: usize,
    current_char_pos: usize,
}

impl<'a> PositionTracker<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text_bytes: text.as_bytes(),
            current_byte_pos: 0,
            current_char_pos: 0,
        }
    }

    /// Advance to `target`, returning its char offset
    pub(crate) fn advance_to_byte(&mut self, target: BytePos) -> anyhow::Result<usize> {
        if target.0 < self.current_byte_pos {
            anyhow::bail!(
                "Cannot seek backwards: current {} > target {}",
                self.current_byte_pos,
                target.0
            );
        }
        if target.0 > self.text_bytes.len() {
            anyhow::bail!(
                "Target byte position {} exceeds text length {}",
                target.0,
                self.text_bytes.len()
            );
        }

        while self.current_byte_pos < target.0 {
            let byte = self.text_bytes[self.current_byte_pos];
            // Continuation bytes (10xxxxxx) belong to the previous char
            if (byte & 0xC0) != 0x80 {
                self.current_char_pos += 1;
            }
            self.current_byte_pos += 1;
        }

        Ok(self.current_char_pos)
    }
}
