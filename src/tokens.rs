/// Separator used to keep a multi-line label block inside a single form field
pub const BLOCK_SEPARATOR: &str = "|||";

/// Delimiters understood by [`split`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    /// One token per line; `\r\n` line endings are accepted
    Newline,
    /// Comma separated, as in `4,5`
    Comma,
    /// The reserved `|||` separator
    Block,
}

/// Split a raw text block into trimmed, non-empty tokens
///
/// Order is preserved and whitespace-only entries are dropped, so an empty
/// input yields an empty list.
///
/// # Examples
/// ```
/// use survey_syntax::tokens::{split, Delimiter};
///
/// assert_eq!(split(" Q1, Q2 ,,Q3", Delimiter::Comma), vec!["Q1", "Q2", "Q3"]);
/// assert!(split("\n \n", Delimiter::Newline).is_empty());
/// ```
pub fn split(raw: &str, delimiter: Delimiter) -> Vec<String> {
    let pieces: Vec<&str> = match delimiter {
        Delimiter::Newline => raw.lines().collect(),
        Delimiter::Comma => raw.split(',').collect(),
        Delimiter::Block => raw.split(BLOCK_SEPARATOR).collect(),
    };

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a label field that may be newline separated, `|||` joined, or both
pub fn split_labels(raw: &str) -> Vec<String> {
    split(raw, Delimiter::Newline)
        .iter()
        .flat_map(|line| split(line, Delimiter::Block))
        .collect()
}

/// Join tokens with the `|||` separator
pub fn join_block(tokens: &[String]) -> String {
    tokens.join(BLOCK_SEPARATOR)
}

/// Positional lookup that falls back to an empty string
pub(crate) fn nth_or_empty(tokens: &[String], index: usize) -> &str {
    tokens.get(index).map(String::as_str).unwrap_or("")
}
