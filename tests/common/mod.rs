#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use env_logger::{Builder, Env};
use tokio::sync::{mpsc, Semaphore};

use thumbscout::{SearchError, SearchEvent, SearchProvider, SearchTerm, ThumbnailListener, Thumbnails};

// Initialize test logger
pub fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

pub fn thumbnails(term: &str) -> Thumbnails {
    Thumbnails::new([
        format!("https://tse.example/{}/1.jpg", term),
        format!("https://tse.example/{}/2.jpg", term),
        format!("https://tse.example/{}/3.jpg", term),
    ])
}

/// Provider with scripted answers per term. Terms without a script get three
/// generated URLs. With a gate, each search waits for one permit.
#[derive(Default)]
pub struct ScriptedProvider {
    answers: Mutex<HashMap<String, Result<Thumbnails, SearchError>>>,
    calls: Mutex<HashMap<String, usize>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose searches each wait for a permit on the returned gate
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let provider = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (provider, gate)
    }

    pub fn answer(self, term: &str, answer: Result<Thumbnails, SearchError>) -> Self {
        self.answers.lock().unwrap().insert(term.to_string(), answer);
        self
    }

    pub fn set_answer(&self, term: &str, answer: Result<Thumbnails, SearchError>) {
        self.answers.lock().unwrap().insert(term.to_string(), answer);
    }

    pub fn calls(&self, term: &str) -> usize {
        self.calls.lock().unwrap().get(term).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl SearchProvider for ScriptedProvider {
    async fn search(&self, term: &SearchTerm) -> Result<Thumbnails, SearchError> {
        *self.calls.lock().unwrap().entry(term.to_string()).or_insert(0) += 1;
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        let answer = self.answers.lock().unwrap().get(term.as_str()).cloned();
        answer.unwrap_or_else(|| Ok(thumbnails(term.as_str())))
    }
}

pub fn channel_listener() -> (Arc<dyn ThumbnailListener>, mpsc::UnboundedReceiver<SearchEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(tx), rx)
}

pub async fn next_event(rx: &mut mpsc::UnboundedReceiver<SearchEvent>) -> SearchEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a search event")
        .expect("listener channel closed")
}
