//! Extraction of `Choice:` / `Reasoning:` pairs from free-form agent answers.

use std::sync::LazyLock;

use regex::Regex;

static RESPONSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)choice:\s*(.*?)\s*reasoning:\s*(.*)")
        .expect("RESPONSE_PATTERN regex should compile")
});

/// The two raw tokens found in an answer. The choice is not validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub choice: String,
    pub reasoning: String,
}

/// Looks for a choice marker followed, anywhere later, by a reasoning marker.
///
/// Anything before the choice marker is ignored. The reasoning runs to the end of
/// the text and may span several lines. Both tokens are trimmed.
///
/// Returns `None` when the markers are missing or out of order.
pub fn parse_response(text: &str) -> Option<ParsedResponse> {
    let captures = RESPONSE_PATTERN.captures(text)?;
    Some(ParsedResponse {
        choice: captures[1].trim().to_owned(),
        reasoning: captures[2].trim().to_owned(),
    })
}
