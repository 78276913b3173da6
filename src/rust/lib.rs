//! Deduplicating, persistent thumbnail search for recognized image labels.
//!
//! A classifier names what it sees; [`Searcher`] turns each label into three
//! thumbnail URLs from an image search provider. Results are cached across
//! restarts, concurrent requests for the same term share one provider call,
//! and every outcome is routed back to the caller's slot by index.
//!
//! # Basic Usage
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use thumbscout::{SearchEvent, Searcher, SearcherConfig, ThumbnailListener};
//! use tokio::sync::mpsc;
//!
//! let searcher = Searcher::new(SearcherConfig::from_env())?;
//! let (tx, mut rx) = mpsc::unbounded_channel::<SearchEvent>();
//! let listener: Arc<dyn ThumbnailListener> = Arc::new(tx);
//!
//! for (index, label) in ["Tabby", "Golden Retriever", "Espresso"].iter().enumerate() {
//!     searcher.find_thumbnails_for(label, index, &listener);
//! }
//!
//! for _ in 0..3 {
//!     match rx.recv().await {
//!         Some(SearchEvent::Found { term, index, thumbnails }) => {
//!             println!("{} -> slot {}: {}", term, index, thumbnails.first());
//!         }
//!         Some(SearchEvent::Error { term, message, .. }) => {
//!             eprintln!("{} failed: {}", term, message);
//!         }
//!         None => break,
//!     }
//! }
//!
//! searcher.save_cache_to_disk();
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Providers
//!
//! Anything implementing [`SearchProvider`] can stand in for the HTTP client:
//!
//! ```
//! use async_trait::async_trait;
//! use thumbscout::{SearchError, SearchProvider, SearchTerm, Thumbnails};
//!
//! struct Placeholder;
//!
//! #[async_trait]
//! impl SearchProvider for Placeholder {
//!     async fn search(&self, term: &SearchTerm) -> Result<Thumbnails, SearchError> {
//!         let url = |n| format!("https://placehold.example/{}/{}.png", term, n);
//!         Ok(Thumbnails::new([url(1), url(2), url(3)]))
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod provider;
pub mod searcher;
pub mod store;
mod term;
mod thumbnails;

pub use config::{ProviderConfig, SearcherConfig, StoreConfig};
pub use error::{SearchError, SearcherError, StoreError};
pub use provider::{parse_thumbnails, BingImageSearch, SearchProvider};
pub use searcher::{Dispatch, SearchEvent, Searcher, SearcherBuilder, ThumbnailListener};
pub use store::{CacheStore, SaveReport};
pub use term::SearchTerm;
pub use thumbnails::{ThumbnailCache, Thumbnails, THUMBNAIL_COUNT};

pub fn init_logger() {
    env_logger::init();
}
