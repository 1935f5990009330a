//! Helpers for feeding prepared documents into a session.

/// Splits prepared text into paragraph utterances.
///
/// Useful when the input is a pasted transcript or notes document
/// rather than a live feed: each blank-line-separated paragraph becomes
/// one utterance.
pub fn segment_paragraphs(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
