use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::term::SearchTerm;
use crate::thumbnails::Thumbnails;

/// Receives the outcome of a [`Searcher::find_thumbnails_for`] call.
///
/// Exactly one of the two methods is called per request, from a worker task.
/// `index` is the caller's slot, echoed back untouched. The searcher keeps
/// the listener alive until then; an implementation whose caller has gone
/// away should ignore the call.
///
/// [`Searcher::find_thumbnails_for`]: super::Searcher::find_thumbnails_for
pub trait ThumbnailListener: Send + Sync {
    fn on_thumbnails_found(&self, term: &SearchTerm, index: usize, thumbnails: &Thumbnails);

    fn on_thumbnails_search_error(&self, term: &SearchTerm, index: usize, error: &str);
}

/// A completed request, as sent to a channel listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Found {
        term: SearchTerm,
        index: usize,
        thumbnails: Thumbnails,
    },
    Error {
        term: SearchTerm,
        index: usize,
        message: String,
    },
}

impl SearchEvent {
    pub fn term(&self) -> &SearchTerm {
        match self {
            Self::Found { term, .. } | Self::Error { term, .. } => term,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Found { index, .. } | Self::Error { index, .. } => *index,
        }
    }
}

/// Forwards outcomes to a channel so the owning thread can drain them at its
/// own pace. A closed receiver silently drops events.
impl ThumbnailListener for UnboundedSender<SearchEvent> {
    fn on_thumbnails_found(&self, term: &SearchTerm, index: usize, thumbnails: &Thumbnails) {
        let _ = self.send(SearchEvent::Found {
            term: term.clone(),
            index,
            thumbnails: thumbnails.clone(),
        });
    }

    fn on_thumbnails_search_error(&self, term: &SearchTerm, index: usize, error: &str) {
        let _ = self.send(SearchEvent::Error {
            term: term.clone(),
            index,
            message: error.to_string(),
        });
    }
}

/// Correlation data threaded through one request.
#[derive(Clone)]
pub(crate) struct RequestContext {
    pub(crate) index: usize,
    listener: Arc<dyn ThumbnailListener>,
}

impl RequestContext {
    pub(crate) fn new(index: usize, listener: &Arc<dyn ThumbnailListener>) -> Self {
        Self {
            index,
            listener: Arc::clone(listener),
        }
    }

    pub(crate) fn deliver(&self, term: &SearchTerm, outcome: &Result<Thumbnails, String>) {
        match outcome {
            Ok(thumbnails) => self.listener.on_thumbnails_found(term, self.index, thumbnails),
            Err(message) => self.listener.on_thumbnails_search_error(term, self.index, message),
        }
    }
}
