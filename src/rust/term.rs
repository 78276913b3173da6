use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized search key: trimmed and lower-cased.
///
/// Two terms are equal only when their normalized text is identical; there is
/// no stemming or fuzzy matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Normalizes `raw` into a term. Blank input yields an empty term; use
    /// [`SearchTerm::parse`] when that needs to be rejected.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    /// Normalizes `raw`, returning `None` when nothing is left to search for.
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        let term = Self::new(raw);
        if term.0.is_empty() {
            None
        } else {
            Some(term)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SearchTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SearchTerm {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SearchTerm {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for SearchTerm {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
