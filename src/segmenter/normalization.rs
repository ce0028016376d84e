// WHY: Display-only cleanup of sentence text; spans always refer to the raw buffer

/// Collapse interior line breaks and whitespace runs into single spaces and trim the ends
pub fn normalize_sentence(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_sentence_into(text, &mut result);
    result
}

/// Normalize into a caller-supplied buffer so batch output can reuse one allocation
pub fn normalize_sentence_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    // "\r\n" is two whitespace chars and collapses like any other run
    for word in text.split_whitespace() {
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(word);
    }
}
