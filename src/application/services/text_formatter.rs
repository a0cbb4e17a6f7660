use std::sync::LazyLock;

use regex::Regex;

static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([.!?…])\s+").expect("sentence break pattern is valid")
});

/// Puts each sentence of a transcript on its own line.
///
/// Whitespace after sentence-terminal punctuation becomes a single newline;
/// the words themselves are left untouched.
pub fn format_sentences(text: &str) -> String {
    SENTENCE_BREAK
        .replace_all(text.trim(), "$1\n")
        .into_owned()
}
