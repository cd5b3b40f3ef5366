use crate::storage::types::Ordinal;

/// Chunks containing this character are markup and never produce a token.
pub const TAG_MARKER: char = '<';

/// Characters removed from a chunk before it becomes a token.
pub const PUNCTUATION: [char; 7] = [',', '.', ':', ')', '(', '{', '}'];

/// Shortest token that gets indexed.
pub const MIN_TOKEN_LEN: usize = 3;

/// Compared case-sensitively, so only already-lowercase candidates match.
pub const STOPWORDS: [&str; 33] = [
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is",
    "it", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there",
    "these", "they", "this", "to", "was", "will", "with",
];

/// A normalized token and the ordinal of the chunk it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub ordinal: Ordinal,
}

/// Splits content into indexable tokens.
///
/// Ordinals count every whitespace-delimited chunk, including the ones that
/// are dropped, so they reflect the chunk's true position in the source text.
pub fn tokenize(content: &str) -> Vec<Token> {
    content
        .split_whitespace()
        .zip(0..)
        .filter(|(chunk, _)| !chunk.contains(TAG_MARKER))
        .filter_map(|(chunk, ordinal)| {
            let candidate = strip_punctuation(chunk);
            is_indexable(&candidate).then_some(Token {
                text: candidate,
                ordinal,
            })
        })
        .collect()
}

/// Removes every `PUNCTUATION` character. Empty input comes back empty.
pub fn strip_punctuation(chunk: &str) -> String {
    chunk.chars().filter(|c| !PUNCTUATION.contains(c)).collect()
}

pub fn is_stopword(candidate: &str) -> bool {
    STOPWORDS.contains(&candidate)
}

fn is_indexable(candidate: &str) -> bool {
    candidate.chars().count() >= MIN_TOKEN_LEN && !is_stopword(candidate)
}

/// Splits a query phrase into terms. Terms are not normalized.
pub fn split_phrase(phrase: &str) -> Vec<String> {
    phrase.split_whitespace().map(str::to_string).collect()
}
