//! Last-query-wins sequencing.
//!
//! Searches are not cancelled when a newer one starts. Instead every search
//! takes a ticket from a monotonically increasing counter, and its result is
//! applied only if no newer ticket has been issued in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::fallback::SearchEngine;
use crate::transport::Transport;
use crate::types::{SearchQuery, SearchResult};

/// Proof of having started a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Issues tickets and tells whether one is still the latest.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: AtomicU64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search; supersedes every earlier ticket.
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// What happened to a finished search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The result became the surface's current result.
    Applied(SearchResult),
    /// A newer search started first; the result was dropped.
    Stale,
}

/// One search surface: an engine, its sequencer, and the result on display.
pub struct SearchSession<T: Transport> {
    engine: Arc<SearchEngine<T>>,
    sequencer: SearchSequencer,
    current: Mutex<Option<SearchResult>>,
}

impl<T: Transport> SearchSession<T> {
    pub fn new(engine: Arc<SearchEngine<T>>) -> Self {
        Self {
            engine,
            sequencer: SearchSequencer::new(),
            current: Mutex::new(None),
        }
    }

    pub fn engine(&self) -> &Arc<SearchEngine<T>> {
        &self.engine
    }

    /// Run a search and apply its result unless a newer search superseded it.
    pub async fn run(&self, query: &SearchQuery) -> SearchOutcome {
        let ticket = self.sequencer.begin();
        let result = self.engine.search(query).await;

        let mut current = self.current.lock().await;
        if !self.sequencer.is_current(ticket) {
            tracing::debug!(
                "Discarding stale result for search #{} ({:?})",
                ticket.sequence(),
                query.raw_term
            );
            return SearchOutcome::Stale;
        }
        *current = Some(result.clone());
        SearchOutcome::Applied(result)
    }

    /// The result currently on display, if any.
    pub async fn current(&self) -> Option<SearchResult> {
        self.current.lock().await.clone()
    }
}
