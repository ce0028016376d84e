// Test fixtures with known texts and the sentences they contain
// WHY: Boundary and cursor properties are checked against the same corpus

/// Single sentence
pub const SINGLE_SENTENCE: &str = "The quick brown fox jumps over the lazy dog.";

/// Two short sentences
pub const WIN_LOSE: &str = "Sometimes you win. Sometimes you lose.";

/// Acronym and decimal number inside the first sentence
pub const ACRONYMS_AND_NUMBERS: &str =
    "In the U.S., there are around 19.9 million college students. This is as of fall 2019.";

/// "etc.," in the middle of a sentence
pub const ETC_MID_SENTENCE: &str = "Integers are numbers like 1, 2, 3, etc., but negative numbers can also be integers. And of course, zero is an integer too.";

/// Multi-paragraph text with quotes, titles and an unterminated heading
pub const PARAGRAPHS: &str = "A Short History\n\nDr. Watson arrived at 5 p.m. with the papers. \"Are they signed?\" asked Holmes.\nThey were not!  Nobody knew why...\n\n   The end.   ";

/// Text with multi-byte characters
pub const UNICODE_TEXT: &str = "Café society met in Zürich. Naïve plans failed… Everyone went home.";

/// Whitespace only
pub const BLANK_TEXT: &str = "  \n\t \n ";

/// Every fixture for property checks
pub const CORPUS: &[&str] = &[
    "",
    BLANK_TEXT,
    SINGLE_SENTENCE,
    WIN_LOSE,
    ACRONYMS_AND_NUMBERS,
    ETC_MID_SENTENCE,
    PARAGRAPHS,
    UNICODE_TEXT,
    "no terminal punctuation at all",
    "Trailing whitespace sentence.     ",
    "   Leading whitespace. Then more",
];
