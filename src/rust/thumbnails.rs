use std::collections::{BTreeMap, HashMap};

use log::warn;
use serde::Serialize;

use crate::error::StoreError;
use crate::term::SearchTerm;

/// Number of thumbnail URLs requested per term and required for a result to
/// be kept.
pub const THUMBNAIL_COUNT: usize = 3;

/// A complete search result: exactly [`THUMBNAIL_COUNT`] thumbnail URLs in
/// provider order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Thumbnails([String; THUMBNAIL_COUNT]);

impl Thumbnails {
    pub fn new(urls: [String; THUMBNAIL_COUNT]) -> Self {
        Self(urls)
    }

    pub fn urls(&self) -> &[String] {
        &self.0
    }

    /// The URL a UI would show when it has room for one image only
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into()
    }
}

impl TryFrom<Vec<String>> for Thumbnails {
    /// The number of URLs that were actually present
    type Error = usize;

    fn try_from(urls: Vec<String>) -> Result<Self, Self::Error> {
        let found = urls.len();
        <[String; THUMBNAIL_COUNT]>::try_from(urls)
            .map(Self)
            .map_err(|_| found)
    }
}

/// Term to thumbnails mapping. Entries are never evicted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbnailCache {
    entries: HashMap<SearchTerm, Thumbnails>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, term: &str) -> Option<&Thumbnails> {
        self.entries.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    /// Stores `thumbnails` for `term`, returning whatever was there before.
    pub fn insert(&mut self, term: SearchTerm, thumbnails: Thumbnails) -> Option<Thumbnails> {
        self.entries.insert(term, thumbnails)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the cache as a JSON object of term -> array of URLs.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Parses the format written by [`ThumbnailCache::to_json`]. Entries that
    /// do not carry exactly [`THUMBNAIL_COUNT`] URLs are dropped. Keys that
    /// normalize to the same term are resolved in key order, the last one
    /// winning.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let raw: BTreeMap<String, Vec<String>> =
            serde_json::from_str(json).map_err(|e| StoreError::Load(e.to_string()))?;

        let mut cache = Self::new();
        for (term, urls) in raw {
            let Some(term) = SearchTerm::parse(&term) else {
                warn!("Dropping cached entry with a blank term");
                continue;
            };
            match Thumbnails::try_from(urls) {
                Ok(thumbnails) => {
                    if cache.insert(term.clone(), thumbnails).is_some() {
                        warn!("Cached entry for '{}' appears more than once, keeping the last", term);
                    }
                }
                Err(found) => {
                    warn!(
                        "Dropping cached entry for '{}': {} urls instead of {}",
                        term, found, THUMBNAIL_COUNT
                    );
                }
            }
        }
        Ok(cache)
    }
}

impl FromIterator<(SearchTerm, Thumbnails)> for ThumbnailCache {
    fn from_iter<I: IntoIterator<Item = (SearchTerm, Thumbnails)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
