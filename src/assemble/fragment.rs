//! Fragment naming rules.
//!
//! Body fragments are named `<chapter>-<chunk>`. Tokens are matched
//! lexically (`"01"` is not `"1"`) and ordered by integer value.

/// Fragment holding the translated book title.
pub const FRONT_TITLE: &str = "front-title";

/// Parse a token made only of ASCII digits.
pub fn parse_number(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// The part of a fragment name before its first `-`.
pub fn chapter_token(name: &str) -> &str {
    name.split_once('-').map_or(name, |(chapter, _)| chapter)
}

/// Name of the fragment holding a chapter's translated title.
pub fn chapter_title_fragment(chapter: &str) -> String {
    format!("{chapter}-title")
}

/// Chunk number of `name` if it is a body fragment of `chapter`.
///
/// The name must have exactly two dash-separated components, the first equal
/// to `chapter` and the second numeric.
pub fn chunk_number(name: &str, chapter: &str) -> Option<u32> {
    let mut parts = name.split('-');
    let (first, second) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || first != chapter {
        return None;
    }
    parse_number(second)
}

/// Distinct numeric chapter tokens, ordered by value.
///
/// Tokens with equal value (`"1"` and `"01"`) are both kept, ordered lexically.
pub fn chapter_tokens<S: AsRef<str>>(names: &[S]) -> Vec<&str> {
    let mut tokens: Vec<(u32, &str)> = names
        .iter()
        .map(|name| chapter_token(name.as_ref()))
        .filter_map(|token| parse_number(token).map(|n| (n, token)))
        .collect();
    tokens.sort_unstable();
    tokens.dedup();
    tokens.into_iter().map(|(_, token)| token).collect()
}
