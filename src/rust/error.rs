use std::io;
use std::path::PathBuf;

/// Failures of a single thumbnail search. All of them leave the term
/// retryable; none is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Transport or HTTP failure, carrying the underlying message
    #[error("{0}")]
    Network(String),
    /// The provider answered with something that is not a usable result
    #[error("Parse error: {0}")]
    Parse(String),
    /// The provider answered, but with fewer thumbnails than required
    #[error("no thumbnails (found {found} of {expected})")]
    Incomplete { found: usize, expected: usize },
    /// Nothing left to search for after normalization
    #[error("search term is empty")]
    EmptyTerm,
}

impl SearchError {
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Incomplete { .. })
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Network(err.to_string())
    }
}

/// Persistence failures. These are logged by the store, never surfaced to
/// listeners.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Load error: {0}")]
    Load(String),
    #[error("Save error for {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SearcherError {
    #[error("Build error: {0}")]
    Build(String),
}
