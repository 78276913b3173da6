//! The search coordinator.
//!
//! A [`Searcher`] owns the thumbnail cache and the set of in-flight terms
//! behind a single lock. Each live search runs on its own Tokio task with the
//! network I/O outside the lock; results are delivered to the listener of
//! every request waiting on that term.

mod builder;
mod listener;

pub use builder::SearcherBuilder;
pub use listener::{SearchEvent, ThumbnailListener};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::SearchError;
use crate::provider::SearchProvider;
use crate::store::{CacheStore, SaveReport};
use crate::term::SearchTerm;
use crate::thumbnails::{ThumbnailCache, Thumbnails};
use listener::RequestContext;

/// What [`Searcher::find_thumbnails_for`] did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Served from the cache; no provider call
    Cached,
    /// A new provider call was started
    Started,
    /// The term was already being searched; the request waits on that search
    Joined,
    /// The term was blank; an error is delivered
    Rejected,
}

#[derive(Default)]
struct SearchState {
    cache: ThumbnailCache,
    /// Requests waiting on each in-flight term, first caller first
    in_flight: HashMap<SearchTerm, Vec<RequestContext>>,
    /// Handles of spawned work, pruned of finished tasks on every spawn.
    /// Dropping a handle detaches the task rather than aborting it.
    tasks: Vec<JoinHandle<()>>,
}

struct Inner {
    state: Mutex<SearchState>,
    store: CacheStore,
    provider: Arc<dyn SearchProvider>,
    runtime: Handle,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, SearchState> {
        // State stays consistent between statements, so a poisoned lock is
        // still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs the provider call for a term already marked in flight. `guard`
    /// was armed when the term was marked, so dropping this future unpolled
    /// still returns the term to idle.
    async fn run_search(self: Arc<Self>, term: SearchTerm, guard: AbortGuard) {
        let result = self.provider.search(&term).await;
        guard.disarm();

        let (waiting, outcome) = {
            let mut state = self.lock_state();
            let waiting = state.in_flight.remove(&term).unwrap_or_default();
            let outcome = match result {
                Ok(thumbnails) => {
                    if state.cache.insert(term.clone(), thumbnails.clone()).is_some() {
                        debug!("Replaced cached thumbnails for '{}'", term);
                    }
                    info!("Found thumbnails for '{}'", term);
                    Ok(thumbnails)
                }
                Err(e) => {
                    warn!("Thumbnail search for '{}' failed: {}", term, e);
                    Err(e.to_string())
                }
            };
            (waiting, outcome)
        };

        debug!("Delivering '{}' to {} waiting request(s)", term, waiting.len());
        for context in &waiting {
            context.deliver(&term, &outcome);
        }
    }
}

/// Returns a term to idle if its search task panics, is aborted, or is never
/// run, failing every request that was waiting on it.
struct AbortGuard {
    inner: Arc<Inner>,
    term: Option<SearchTerm>,
}

impl AbortGuard {
    fn disarm(mut self) {
        self.term = None;
    }
}

impl Drop for AbortGuard {
    fn drop(&mut self) {
        let Some(term) = self.term.take() else {
            return;
        };
        let waiting = self.inner.lock_state().in_flight.remove(&term).unwrap_or_default();
        error!("Search for '{}' ended without a result", term);
        let outcome = Err(format!("search for '{}' was interrupted", term));
        for context in &waiting {
            context.deliver(&term, &outcome);
        }
    }
}

/// Deduplicating, caching thumbnail searcher.
///
/// ```no_run
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// use std::sync::Arc;
/// use thumbscout::{SearchEvent, Searcher, SearcherConfig, ThumbnailListener};
/// use tokio::sync::mpsc;
///
/// let searcher = Searcher::new(SearcherConfig::from_env())?;
/// let (tx, mut rx) = mpsc::unbounded_channel::<SearchEvent>();
/// let listener: Arc<dyn ThumbnailListener> = Arc::new(tx);
///
/// searcher.find_thumbnails_for("tabby cat", 0, &listener);
/// if let Some(SearchEvent::Found { thumbnails, .. }) = rx.recv().await {
///     println!("{}", thumbnails.first());
/// }
/// searcher.save_cache_to_disk();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Searcher {
    inner: Arc<Inner>,
}

impl Searcher {
    /// Creates a new SearcherBuilder for fluent construction
    pub fn builder() -> SearcherBuilder {
        SearcherBuilder::new()
    }

    /// Searcher backed by the HTTP image search provider and the store
    /// described by `config`. Must be called within a Tokio runtime.
    pub fn new(config: crate::SearcherConfig) -> Result<Self, crate::SearcherError> {
        let provider = crate::BingImageSearch::new(config.provider).map_err(|e| {
            crate::SearcherError::Build(format!("Failed to create search provider: {}", e))
        })?;
        Self::builder()
            .with_store(CacheStore::new(config.store))
            .with_provider(Arc::new(provider))
            .build()
    }

    fn from_parts(store: CacheStore, provider: Arc<dyn SearchProvider>, runtime: Handle) -> Self {
        let cache = store.load();
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SearchState {
                    cache,
                    ..SearchState::default()
                }),
                store,
                provider,
                runtime,
            }),
        }
    }

    /// Requests thumbnails for `term` on behalf of slot `index`.
    ///
    /// Returns immediately. The outcome always reaches `listener` from a
    /// worker task, cache hits included. Concurrent requests for a term that
    /// is already being searched share that search and each receive the
    /// result under their own index.
    pub fn find_thumbnails_for(
        &self,
        term: impl AsRef<str>,
        index: usize,
        listener: &Arc<dyn ThumbnailListener>,
    ) -> Dispatch {
        let context = RequestContext::new(index, listener);
        let raw = term.as_ref();

        let Some(term) = SearchTerm::parse(raw) else {
            warn!("Rejecting blank search term {:?} at index {}", raw, index);
            let term = SearchTerm::new(raw);
            self.spawn(async move {
                context.deliver(&term, &Err(SearchError::EmptyTerm.to_string()));
            });
            return Dispatch::Rejected;
        };

        // The state lock is released before spawning: a future dropped by a
        // shut-down runtime runs its guard, which needs the lock.
        let guard = {
            let mut state = self.inner.lock_state();

            if let Some(thumbnails) = state.cache.get(term.as_str()).cloned() {
                drop(state);
                debug!("Cache hit for '{}' at index {}", term, index);
                self.spawn(async move {
                    context.deliver(&term, &Ok(thumbnails));
                });
                return Dispatch::Cached;
            }

            if let Some(waiting) = state.in_flight.get_mut(&term) {
                debug!("'{}' already in flight, index {} will share the result", term, index);
                waiting.push(context);
                return Dispatch::Joined;
            }

            state.in_flight.insert(term.clone(), vec![context]);
            AbortGuard {
                inner: Arc::clone(&self.inner),
                term: Some(term.clone()),
            }
        };

        debug!("Dispatching search for '{}' at index {}", term, index);
        let inner = Arc::clone(&self.inner);
        self.spawn(inner.run_search(term, guard));
        Dispatch::Started
    }

    fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let handle = self.inner.runtime.spawn(task);
        let mut state = self.inner.lock_state();
        state.tasks.retain(|task| !task.is_finished());
        state.tasks.push(handle);
    }

    /// Persists the current cache. Failures are logged, not returned.
    pub fn save_cache_to_disk(&self) -> SaveReport {
        let snapshot = self.inner.lock_state().cache.clone();
        self.inner.store.save(&snapshot)
    }

    pub fn cached(&self, term: &str) -> Option<Thumbnails> {
        let term = SearchTerm::new(term);
        self.inner.lock_state().cache.get(term.as_str()).cloned()
    }

    pub fn is_in_flight(&self, term: &str) -> bool {
        let term = SearchTerm::new(term);
        self.inner.lock_state().in_flight.contains_key(&term)
    }

    pub fn in_flight_count(&self) -> usize {
        self.inner.lock_state().in_flight.len()
    }

    pub fn cache_len(&self) -> usize {
        self.inner.lock_state().cache.len()
    }

    /// Copy of the cache as it is right now
    pub fn cache_snapshot(&self) -> ThumbnailCache {
        self.inner.lock_state().cache.clone()
    }

    /// Waits until every dispatched search and delivery has finished,
    /// including ones started while waiting.
    pub async fn wait_idle(&self) {
        loop {
            let tasks = std::mem::take(&mut self.inner.lock_state().tasks);
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                if let Err(e) = task.await {
                    error!("Search task failed: {}", e);
                }
            }
        }
    }
}
