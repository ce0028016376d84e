// WHY: Centralized abbreviation handling for sentence boundary detection
// A period ending a dictionary word or an initial never closes a sentence

use std::collections::HashSet;

/// Title abbreviations, always followed by a name
pub const TITLE_ABBREVIATIONS: &[&str] = &[
    "Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "Sr.", "Jr.", "St.", "Rev.", "Gen.", "Capt.", "Lt.",
    "Col.", "Sgt.", "Gov.", "Sen.", "Rep.", "Hon.",
];

/// Other abbreviations that should not cause sentence splits
pub const GENERAL_ABBREVIATIONS: &[&str] = &[
    "etc.", "vs.", "e.g.", "i.e.", "cf.", "approx.", "est.", "dept.", "fig.", "vol.", "ch.",
    "ft.", "lbs.", "oz.", "mi.", "km.", "a.m.", "p.m.", "Inc.", "Ltd.", "Corp.", "Co.", "Jan.",
    "Feb.", "Aug.", "Sept.", "Oct.", "Nov.", "Dec.", "Ph.D.", "et al.",
];

/// Default dictionary: titles followed by general abbreviations
pub fn default_abbreviations() -> Vec<String> {
    TITLE_ABBREVIATIONS
        .iter()
        .chain(GENERAL_ABBREVIATIONS)
        .map(|abbr| abbr.to_string())
        .collect()
}

/// Case-insensitive abbreviation lookup keyed on the lowercased word
#[derive(Debug, Clone)]
pub struct AbbreviationChecker {
    abbreviations: HashSet<String>,
    /// Multi-word entries such as "et al." keyed by their final word
    multi_word: Vec<Vec<String>>,
    initials_are_abbreviations: bool,
}

impl AbbreviationChecker {
    /// Build a checker from dictionary entries; each entry should end with a period
    pub fn new<I, S>(entries: I, initials_are_abbreviations: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut abbreviations = HashSet::new();
        let mut multi_word = Vec::new();

        for entry in entries {
            let entry = entry.as_ref().trim().to_lowercase();
            if entry.is_empty() {
                continue;
            }
            let words: Vec<String> = entry.split_whitespace().map(str::to_string).collect();
            if words.len() > 1 {
                multi_word.push(words);
            } else {
                abbreviations.insert(entry);
            }
        }

        Self {
            abbreviations,
            multi_word,
            initials_are_abbreviations,
        }
    }

    /// Check if a single word (including its trailing period) is a known abbreviation
    pub fn is_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.contains(&word.to_lowercase())
    }

    /// Check if a word is an initial ("J.") or a chain of initials ("U.S.", "e.g.")
    pub fn is_initialism(word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < 2 || chars.len() % 2 != 0 {
            return false;
        }

        let well_formed = chars
            .chunks(2)
            .all(|pair| pair[0].is_alphabetic() && pair[1] == '.');
        if !well_formed {
            return false;
        }

        // WHY: A lone lowercase letter ("plan a.") is a word, not an initial
        chars.len() > 2 || chars[0].is_uppercase()
    }

    /// Check if `text` ends with a word whose period must not end a sentence
    /// WHY: Examines the last word in context, ignoring opening quotes/brackets glued to it
    pub fn ends_with_abbreviation(&self, text: &str) -> bool {
        let mut words = text.split_whitespace().rev();
        let Some(last_word) = words.next() else {
            return false;
        };

        let clean_word = last_word.trim_start_matches(|c: char| {
            matches!(c, '"' | '\'' | '\u{201C}' | '\u{2018}' | '(' | '[' | '{')
        });

        if self.is_abbreviation(clean_word) {
            return true;
        }
        if self.initials_are_abbreviations && Self::is_initialism(clean_word) {
            return true;
        }

        let clean_lower = clean_word.to_lowercase();
        self.multi_word.iter().any(|entry| {
            let (final_word, leading) = match entry.split_last() {
                Some(split) => split,
                None => return false,
            };
            if *final_word != clean_lower {
                return false;
            }
            let preceding: Vec<String> = text
                .split_whitespace()
                .rev()
                .skip(1)
                .take(leading.len())
                .map(str::to_lowercase)
                .collect();
            preceding.len() == leading.len() && preceding.iter().rev().eq(leading.iter())
        })
    }
}

impl Default for AbbreviationChecker {
    fn default() -> Self {
        Self::new(default_abbreviations(), true)
    }
}
