// WHY: Rule-based sentence detection over regex-automata candidate boundaries
// Candidates are found in one regex pass; abbreviation and casing rules then veto false splits

use anyhow::Result;
use regex_automata::meta::Regex;
use tracing::{debug, trace, warn};

use super::{AbbreviationChecker, Segmenter, SegmentationRules};
use crate::span::{BytePos, PositionTracker, TextSpan};

/// A detected sentence borrowing its raw text from the source buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedSentence<'a> {
    pub index: usize,
    /// Raw, trimmed sentence text
    pub raw_content: &'a str,
    pub span: TextSpan,
}

impl<'a> DetectedSentence<'a> {
    pub fn raw(&self) -> &str {
        self.raw_content
    }

    /// Normalized copy for display
    pub fn normalize(&self) -> String {
        super::normalize_sentence(self.raw_content)
    }
}

/// Default segmentation strategy driven by [`SegmentationRules`]
#[derive(Debug)]
pub struct RuleSegmenter {
    rules: SegmentationRules,
    /// Terminal run, optional closers, then whitespace or end of text
    candidate_pattern: Regex,
    /// Blank line separating paragraphs
    hard_separator: Regex,
    abbreviation_checker: AbbreviationChecker,
}

/// Escape a char for use inside a regex character class
fn class_escape(ch: char) -> String {
    format!("\\x{{{:X}}}", ch as u32)
}

fn char_class(chars: &[char]) -> String {
    let body: String = chars.iter().copied().map(class_escape).collect();
    format!("[{body}]")
}

impl RuleSegmenter {
    /// Compile a segmenter for the given rules
    pub fn new(rules: SegmentationRules) -> Result<Self> {
        rules.validate()?;

        let terminal = char_class(&rules.terminal_punctuation);
        let candidate = if rules.closing_punctuation.is_empty() {
            format!(r"{terminal}+(?:\s+|\z)")
        } else {
            let closing = char_class(&rules.closing_punctuation);
            format!(r"{terminal}+{closing}*(?:\s+|\z)")
        };
        let hard_separator = r"\n[ \t\r]*\n\s*";

        debug!("Compiling sentence candidate pattern: {}", candidate);

        let candidate_pattern = Regex::new(&candidate)?;
        let hard_separator = Regex::new(hard_separator)?;
        let abbreviation_checker =
            AbbreviationChecker::new(&rules.abbreviations, rules.initials_are_abbreviations);

        Ok(Self {
            rules,
            candidate_pattern,
            hard_separator,
            abbreviation_checker,
        })
    }

    /// Create a segmenter with the default rules
    pub fn with_default_rules() -> Result<Self> {
        Self::new(SegmentationRules::default())
    }

    pub fn rules(&self) -> &SegmentationRules {
        &self.rules
    }

    /// Detect sentences, returning char spans
    pub fn detect_sentences(&self, text: &str) -> Result<Vec<TextSpan>> {
        let byte_spans = self.detect_byte_spans(text);

        let mut tracker = PositionTracker::new(text);
        let mut spans = Vec::with_capacity(byte_spans.len());
        for (start, end) in byte_spans {
            let start = tracker.advance_to_byte(start)?;
            let end = tracker.advance_to_byte(end)?;
            spans.push(TextSpan { start, end });
        }

        debug!("Rule segmenter detected {} sentences", spans.len());
        Ok(spans)
    }

    /// Detect sentences with borrowed raw content
    pub fn detect_sentences_borrowed<'a>(&self, text: &'a str) -> Result<Vec<DetectedSentence<'a>>> {
        let byte_spans = self.detect_byte_spans(text);

        let mut tracker = PositionTracker::new(text);
        let mut sentences = Vec::with_capacity(byte_spans.len());
        for (index, (start, end)) in byte_spans.into_iter().enumerate() {
            let char_start = tracker.advance_to_byte(start)?;
            let char_end = tracker.advance_to_byte(end)?;
            sentences.push(DetectedSentence {
                index,
                raw_content: &text[start.0..end.0],
                span: TextSpan {
                    start: char_start,
                    end: char_end,
                },
            });
        }

        Ok(sentences)
    }

    /// Byte ranges of every sentence, ascending and trimmed
    fn detect_byte_spans(&self, text: &str) -> Vec<(BytePos, BytePos)> {
        let mut spans = Vec::new();

        if !self.rules.split_on_blank_lines {
            self.detect_in_block(text, BytePos::new(0), BytePos::new(text.len()), &mut spans);
            return spans;
        }

        let mut block_start = BytePos::new(0);
        for separator in self.hard_separator.find_iter(text) {
            self.detect_in_block(text, block_start, BytePos::new(separator.start()), &mut spans);
            block_start = BytePos::new(separator.end());
        }
        self.detect_in_block(text, block_start, BytePos::new(text.len()), &mut spans);

        spans
    }

    fn detect_in_block(
        &self,
        text: &str,
        block_start: BytePos,
        block_end: BytePos,
        spans: &mut Vec<(BytePos, BytePos)>,
    ) {
        let block = &text[block_start.0..block_end.0];
        let mut sentence_start = 0;

        for candidate in self.candidate_pattern.find_iter(block) {
            // Punctuation plus closers; the trailing whitespace is the separator
            let matched = &block[candidate.start()..candidate.end()];
            let punct_end = candidate.start() + matched.trim_end().len();

            if !self.is_boundary(block, sentence_start, candidate.start(), punct_end, candidate.end()) {
                trace!(offset = candidate.start(), "Rejected sentence boundary candidate");
                continue;
            }

            push_trimmed(
                spans,
                text,
                block_start.advance(sentence_start),
                block_start.advance(punct_end),
            );
            sentence_start = candidate.end();
        }

        // Unterminated trailing fragment
        push_trimmed(spans, text, block_start.advance(sentence_start), block_end);
    }

    /// Decide whether the candidate at `punct_start..punct_end` closes the sentence
    fn is_boundary(
        &self,
        block: &str,
        sentence_start: usize,
        punct_start: usize,
        punct_end: usize,
        next_start: usize,
    ) -> bool {
        if next_start >= block.len() {
            return true;
        }

        if self.rules.lowercase_continues_sentence {
            // WHY: Look past opening quotes/brackets to the first word character
            let next_word_char = block[next_start..].chars().find(|c| c.is_alphanumeric());
            if next_word_char.is_some_and(char::is_lowercase) {
                return false;
            }
        }

        let closing = &self.rules.closing_punctuation;
        let terminal_run = block[punct_start..punct_end].trim_end_matches(|c: char| closing.contains(&c));

        // Only a single period can belong to an abbreviation; "..." and "?!" cannot
        if terminal_run == "." {
            let preceding = &block[sentence_start..punct_start + 1];
            if self.abbreviation_checker.ends_with_abbreviation(preceding) {
                return false;
            }
        }

        true
    }
}

/// Push `[start, end)` trimmed of whitespace, skipping whitespace-only ranges
fn push_trimmed(spans: &mut Vec<(BytePos, BytePos)>, text: &str, start: BytePos, end: BytePos) {
    if start >= end {
        return;
    }
    let raw = &text[start.0..end.0];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let leading = raw.len() - raw.trim_start().len();
    let trimmed_start = start.advance(leading);
    spans.push((trimmed_start, trimmed_start.advance(trimmed.len())));
}

impl Segmenter for RuleSegmenter {
    fn segment(&self, text: &str) -> Vec<TextSpan> {
        match self.detect_sentences(text) {
            Ok(spans) => spans,
            Err(error) => {
                // Byte spans are produced in ascending order, so this is unreachable in practice
                warn!(%error, "Sentence detection failed; reporting no sentences");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(text: &str) -> Vec<String> {
        let segmenter = RuleSegmenter::with_default_rules().unwrap();
        segmenter
            .segment(text)
            .iter()
            .map(|span| span.slice(text).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(
            sentences("Sometimes you win. Sometimes you lose."),
            vec!["Sometimes you win.", "Sometimes you lose."]
        );
    }

    #[test]
    fn test_acronyms_and_decimals() {
        let text = "In the U.S., there are around 19.9 million college students. This is as of fall 2019.";
        assert_eq!(
            sentences(text),
            vec![
                "In the U.S., there are around 19.9 million college students.",
                "This is as of fall 2019."
            ]
        );
    }

    #[test]
    fn test_abbreviation_handling() {
        let test_cases = [
            (
                "Dr. Smith examined the patient. The results were clear.",
                vec!["Dr. Smith examined the patient.", "The results were clear."],
            ),
            (
                "Mr. and Mrs. Johnson arrived. They were late.",
                vec!["Mr. and Mrs. Johnson arrived.", "They were late."],
            ),
            (
                "The book is by J. R. R. Tolkien. It is long.",
                vec!["The book is by J. R. R. Tolkien.", "It is long."],
            ),
            (
                "Bring fruit, e.g. Apples or pears. Then leave.",
                vec!["Bring fruit, e.g. Apples or pears.", "Then leave."],
            ),
            (
                "Integers are numbers like 1, 2, 3, etc., but negative numbers can also be integers. And of course, zero is an integer too.",
                vec![
                    "Integers are numbers like 1, 2, 3, etc., but negative numbers can also be integers.",
                    "And of course, zero is an integer too.",
                ],
            ),
        ];

        for (input, expected) in test_cases {
            assert_eq!(sentences(input), expected, "Input: {}", input);
        }
    }

    #[test]
    fn test_exclamations_questions_and_quotes() {
        assert_eq!(
            sentences("What? No way! \"Stop.\" She left."),
            vec!["What?", "No way!", "\"Stop.\"", "She left."]
        );
    }

    #[test]
    fn test_lowercase_continuation_and_ellipsis() {
        assert_eq!(
            sentences("Well... maybe not. Wait... What happened?"),
            vec!["Well... maybe not.", "Wait...", "What happened?"]
        );
    }

    #[test]
    fn test_blank_line_is_hard_separator() {
        assert_eq!(
            sentences("A heading without a period\n\nThe body starts here. It continues."),
            vec!["A heading without a period", "The body starts here.", "It continues."]
        );
        assert_eq!(
            sentences("First.\r\n\r\nSecond."),
            vec!["First.", "Second."]
        );
    }

    #[test]
    fn test_blank_lines_can_be_ignored() {
        let rules = SegmentationRules {
            split_on_blank_lines: false,
            ..SegmentationRules::default()
        };
        let segmenter = RuleSegmenter::new(rules).unwrap();
        let text = "no period here\n\nstill going.";
        let spans = segmenter.segment(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].slice(text), Some(text));
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert!(sentences("").is_empty());
        assert!(sentences("   \n\t  ").is_empty());
        assert!(sentences("\n\n\n").is_empty());
    }

    #[test]
    fn test_unterminated_text_is_one_sentence() {
        let segmenter = RuleSegmenter::with_default_rules().unwrap();
        assert_eq!(segmenter.segment("hello world"), vec![TextSpan::new(0, 11)]);
        assert_eq!(sentences("  a heading without punctuation \n"), vec!["a heading without punctuation"]);
        assert_eq!(sentences("Done. and then"), vec!["Done. and then"]);
        assert_eq!(sentences("Done. Then nothing"), vec!["Done.", "Then nothing"]);
    }

    #[test]
    fn test_spans_trimmed_and_multibyte_offsets() {
        let segmenter = RuleSegmenter::with_default_rules().unwrap();
        let text = "  Ça va. Très bien!  ";
        let spans = segmenter.segment(text);
        assert_eq!(spans, vec![TextSpan::new(2, 8), TextSpan::new(9, 19)]);
        assert_eq!(spans[1].slice(text), Some("Très bien!"));
    }

    #[test]
    fn test_borrowed_matches_spans() {
        let segmenter = RuleSegmenter::with_default_rules().unwrap();
        let text = "First line\nwraps. Second one.";
        let borrowed = segmenter.detect_sentences_borrowed(text).unwrap();
        let spans = segmenter.detect_sentences(text).unwrap();

        assert_eq!(borrowed.len(), spans.len());
        for (sentence, span) in borrowed.iter().zip(&spans) {
            assert_eq!(sentence.span, *span);
            assert_eq!(Some(sentence.raw()), span.slice(text));
        }
        assert_eq!(borrowed[0].index, 0);
        assert_eq!(borrowed[0].normalize(), "First line wraps.");
    }

    #[test]
    fn test_custom_abbreviations() {
        let rules = SegmentationRules {
            abbreviations: vec!["approx.".to_string()],
            ..SegmentationRules::default()
        };
        let segmenter = RuleSegmenter::new(rules).unwrap();
        let text = "It weighs approx. Forty pounds. Dr. Who agrees.";
        let spans = segmenter.segment(text);
        let found: Vec<_> = spans.iter().map(|s| s.slice(text).unwrap()).collect();
        assert_eq!(found, vec!["It weighs approx. Forty pounds.", "Dr.", "Who agrees."]);
    }
}
