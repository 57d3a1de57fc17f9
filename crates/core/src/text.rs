/// Collapses every whitespace run (newlines and tabs included) to one space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Number of maximal runs of word characters (alphanumerics and underscore).
pub fn count_word_tokens(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;
    for c in text.chars() {
        let word = is_word_char(c);
        if word && !in_word {
            count += 1;
        }
        in_word = word;
    }
    count
}

/// Joins per-unit text (pages, text nodes) with a single space, then normalizes.
pub fn join_normalized<I, S>(pieces: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for piece in pieces {
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(piece.as_ref());
    }
    normalize_whitespace(&joined)
}
