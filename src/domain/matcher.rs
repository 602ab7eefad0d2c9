//! Whole-token identifier matching.
//!
//! An identifier counts as present on a page only when it occurs as a
//! delimited word, never as a substring of a longer token: "45" must not
//! match inside "4567". Identifiers are matched literally, so registration
//! numbers with leading zeros keep their exact spelling.

use crate::error::{SplitError, SplitResult};
use regex::Regex;

/// Word-boundary matcher for one roster identifier.
///
/// The identifier is escaped before compilation, so it is always treated as
/// a literal even if it contains regex metacharacters.
#[derive(Debug, Clone)]
pub struct TokenMatcher {
    identifier: String,
    pattern: Regex,
}

impl TokenMatcher {
    /// Compiles a whole-token pattern for the given identifier.
    ///
    /// A blank identifier is rejected: the bare word-boundary pattern it
    /// would compile to matches next to every token on every page.
    pub fn new(identifier: &str) -> SplitResult<Self> {
        if identifier.trim().is_empty() {
            return Err(SplitError::RecordProcessing {
                identifier: identifier.to_string(),
                message: "identifier is blank".to_string(),
                source: None,
            });
        }

        let pattern =
            Regex::new(&format!(r"\b{}\b", regex::escape(identifier))).map_err(|e| {
                SplitError::RecordProcessing {
                    identifier: identifier.to_string(),
                    message: format!("invalid match pattern: {}", e),
                    source: Some(Box::new(e)),
                }
            })?;

        Ok(Self {
            identifier: identifier.to_string(),
            pattern,
        })
    }

    /// The literal identifier this matcher searches for.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Whether the identifier occurs as a whole token in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}
