//! Free-text keyword matching over upstream error messages

use std::fmt;

/// Multi-pattern substring search used by the keyword disable rule.
///
/// Implementations must treat matching as case-insensitive; the classifier
/// already lowercases the haystack.
pub trait KeywordMatcher: Send + Sync + fmt::Debug {
    fn matches(&self, haystack: &str, keywords: &[String]) -> bool;
}

/// Plain substring search, one pass per keyword
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl KeywordMatcher for SubstringMatcher {
    fn matches(&self, haystack: &str, keywords: &[String]) -> bool {
        let haystack = haystack.to_lowercase();
        keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .any(|k| haystack.contains(&k.to_lowercase()))
    }
}
