//! Substring Extractor
//!
//! Carves a tagged region out of a larger text stream. The SPM front-end
//! uses this to lift an embedded `<SPMPlots ... </SPMPlots>` fragment out
//! of mixed console output before handing it to the XML boundary.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetError {
    /// The named tag does not occur in the text.
    TagNotFound(String),
}

impl fmt::Display for SnippetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnippetError::TagNotFound(tag) => write!(f, "tag '{}' not found", tag),
        }
    }
}

impl std::error::Error for SnippetError {}

/// The maximal substring from the first occurrence of `start_tag` through
/// the end of the first subsequent occurrence of `end_tag`, inclusive.
pub fn between<'a>(
    text: &'a str,
    start_tag: &str,
    end_tag: &str,
) -> Result<&'a str, SnippetError> {
    let start = text
        .find(start_tag)
        .ok_or_else(|| SnippetError::TagNotFound(start_tag.to_string()))?;
    let end_rel = text[start..]
        .find(end_tag)
        .ok_or_else(|| SnippetError::TagNotFound(end_tag.to_string()))?;
    let end = start + end_rel + end_tag.len();
    Ok(&text[start..end])
}
