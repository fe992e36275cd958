//! talent-search — candidate search orchestration for the talent marketplace.
//!
//! Turns a free-text query plus structured filters into the right backend
//! request, falls back through a simplified request and then synthetic
//! profiles when the backend misbehaves, and normalizes every response
//! envelope into [`CanonicalCandidate`] records.

pub mod envelope;
pub mod fallback;
pub mod filters;
pub mod mock;
pub mod mode;
pub mod normalize;
pub mod reducer;
pub mod request;
pub mod sequence;
pub mod transport;
pub mod types;

pub use envelope::{parse, EnvelopeShape, ParsedEnvelope};
pub use fallback::{ChainState, SearchEngine};
pub use filters::FilterOptions;
pub use mock::MockGenerator;
pub use mode::{required_terms, select_mode};
pub use normalize::CandidateNormalizer;
pub use reducer::{reduce, QueryAction};
pub use request::{build, build_secondary, HttpMethod, HttpRequestSpec};
pub use sequence::{SearchOutcome, SearchSequencer, SearchSession, SearchTicket};
pub use transport::{
    HttpTransport, RawResponse, StaticToken, TokenProvider, Transport, DEFAULT_TIMEOUT_MS,
};
pub use types::*;
