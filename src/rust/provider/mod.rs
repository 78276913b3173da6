//! Outbound thumbnail search.
//!
//! The coordinator only sees the [`SearchProvider`] seam; [`BingImageSearch`]
//! is the HTTP implementation used by the binary.

mod bing;
mod response;

pub use bing::BingImageSearch;
pub use response::parse_thumbnails;

use async_trait::async_trait;

use crate::error::SearchError;
use crate::term::SearchTerm;
use crate::thumbnails::Thumbnails;

/// One search attempt per call, no retries.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, term: &SearchTerm) -> Result<Thumbnails, SearchError>;
}
