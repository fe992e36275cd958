//! The search fallback chain.
//!
//! ```text
//! Primary --ok--> Done
//!    | fail
//!    v
//! Secondary --ok--> Done          (CommaAnd and SimpleOr only)
//!    | fail / none
//!    v
//! Synthetic --> Done(degraded)
//! ```
//!
//! One attempt per state, strictly in order. Transport and HTTP errors stop
//! here; callers always get a [`SearchResult`].

use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::envelope::{self, EnvelopeShape};
use crate::filters::FilterOptions;
use crate::mock::MockGenerator;
use crate::mode::select_mode;
use crate::normalize::CandidateNormalizer;
use crate::request::{self, HttpRequestSpec};
use crate::transport::Transport;
use crate::types::{Pagination, QueryMode, ResultSource, SearchQuery, SearchResult, TalentResult};

/// Position in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Primary,
    Secondary,
    Synthetic,
}

impl std::fmt::Display for ChainState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChainState::Primary => "primary",
            ChainState::Secondary => "secondary",
            ChainState::Synthetic => "synthetic",
        };
        f.write_str(name)
    }
}

/// Orchestrates mode selection, requests, parsing and fallback.
pub struct SearchEngine<T: Transport> {
    transport: T,
    mock: MockGenerator,
    seed: Option<u64>,
    searches: AtomicU64,
}

impl<T: Transport> SearchEngine<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            mock: MockGenerator::new(),
            seed: None,
            searches: AtomicU64::new(0),
        }
    }

    /// Make synthesized fields reproducible.
    ///
    /// The n-th search of this engine uses an RNG seeded with `seed ^ n`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_mock_generator(mut self, mock: MockGenerator) -> Self {
        self.mock = mock;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn next_rng(&self) -> StdRng {
        let n = self.searches.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ n),
            None => StdRng::from_entropy(),
        }
    }

    /// Run one search through the chain. Never fails.
    pub async fn search(&self, query: &SearchQuery) -> SearchResult {
        let mode = select_mode(query);
        let mut rng = self.next_rng();

        for warning in query.warnings() {
            tracing::warn!("Sending query with {warning}");
        }

        let primary = request::build(query, mode);
        tracing::debug!("[{}] {mode} -> {}", ChainState::Primary, primary.display_target());

        let primary_err = match self.attempt(&primary, mode, &mut rng).await {
            Ok(result) => return self.finish(query, result, ResultSource::Primary),
            Err(e) => e,
        };
        tracing::warn!("Primary {mode} search failed: {primary_err}");

        let mut failures = vec![format!("{} ({})", ChainState::Primary, primary_err.kind())];

        if let Some(secondary) = request::build_secondary(query, mode) {
            tracing::debug!("[{}] {mode} -> {}", ChainState::Secondary, secondary.display_target());
            match self.attempt(&secondary, mode, &mut rng).await {
                Ok(result) => return self.finish(query, result, ResultSource::Secondary),
                Err(e) => {
                    tracing::warn!("Secondary {mode} search failed: {e}");
                    failures.push(format!("{} ({})", ChainState::Secondary, e.kind()));
                }
            }
        }

        tracing::debug!("[{}] {mode} -> mock generator", ChainState::Synthetic);
        let candidates = self.mock.generate(query, &mut rng);
        let reason = format!(
            "Live search is unavailable ({} failed); showing sample profiles.",
            failures.join(", ")
        );
        tracing::warn!("{reason}");

        let result = SearchResult {
            pagination: Pagination::single_page(candidates.len()),
            candidates,
            degraded: true,
            degradation_reason: Some(reason),
            mode,
            source: ResultSource::Synthetic,
        };
        self.finish(query, result, ResultSource::Synthetic)
    }

    /// One request: send, parse the envelope, normalize.
    async fn attempt(
        &self,
        spec: &HttpRequestSpec,
        mode: QueryMode,
        rng: &mut StdRng,
    ) -> TalentResult<SearchResult> {
        let raw = self.transport.send(spec).await?;
        let parsed = envelope::parse(&raw);

        match parsed.shape {
            EnvelopeShape::Unrecognized => {
                tracing::warn!(
                    "{}: response matched no known envelope, treating as empty",
                    spec.path
                );
            }
            shape if parsed.raw_candidates.is_empty() => {
                tracing::debug!("{}: {shape:?} envelope with zero results", spec.path);
            }
            shape => {
                tracing::debug!(
                    "{}: {shape:?} envelope with {} records",
                    spec.path,
                    parsed.raw_candidates.len()
                );
            }
        }

        let candidates = CandidateNormalizer::new(rng).normalize_all(&parsed.raw_candidates);

        Ok(SearchResult {
            candidates,
            pagination: parsed.pagination,
            degraded: false,
            degradation_reason: None,
            mode,
            source: ResultSource::Primary,
        })
    }

    fn finish(
        &self,
        query: &SearchQuery,
        mut result: SearchResult,
        source: ResultSource,
    ) -> SearchResult {
        result.source = source;
        tracing::info!(
            "Search {:?} ({}) returned {} of {} candidates via {:?}{}",
            query.raw_term,
            result.mode,
            result.candidates.len(),
            result.pagination.total_results,
            source,
            if result.degraded { " [degraded]" } else { "" }
        );
        result
    }

    /// Fetch filter metadata, falling back to options built from the sample pool.
    pub async fn filter_options(&self) -> FilterOptions {
        match self.fetch_filter_options().await {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!("Filter options unavailable ({e}); using built-in options");
                FilterOptions::builtin(&self.mock)
            }
        }
    }

    async fn fetch_filter_options(&self) -> TalentResult<FilterOptions> {
        let raw = self.transport.send(&request::filter_options()).await?;
        FilterOptions::from_value(raw.body)
    }
}
