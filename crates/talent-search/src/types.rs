//! Core data types for candidate searches and their results.

use serde::{Deserialize, Serialize};

/// Default number of candidates requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum number of skills kept on a canonical candidate.
pub const MAX_SKILLS: usize = 5;

/// Whether every term must match (AND) or any one term (OR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchLogic {
    And,
    Or,
}

impl MatchLogic {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLogic::And => "AND",
            MatchLogic::Or => "OR",
        }
    }
}

/// A single user search: free text plus structured filters.
///
/// Built fresh for every search action and never mutated in place; use
/// [`crate::reducer::reduce`] to derive the next query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchQuery {
    pub raw_term: String,
    pub selected_technologies: Vec<String>,
    pub domain_experience: Option<String>,
    pub min_experience: Option<u32>,
    pub max_experience: Option<u32>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub availability: Option<String>,
    pub certification: Option<String>,
    pub explicit_mode: Option<MatchLogic>,
    pub page: u32,
    pub size: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            raw_term: String::new(),
            selected_technologies: Vec::new(),
            domain_experience: None,
            min_experience: None,
            max_experience: None,
            region: None,
            city: None,
            country: None,
            availability: None,
            certification: None,
            explicit_mode: None,
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchQuery {
    /// Query with only a free-text term.
    pub fn term(raw_term: impl Into<String>) -> Self {
        Self {
            raw_term: raw_term.into(),
            ..Self::default()
        }
    }

    /// Selected technologies with blank entries removed.
    pub fn technologies(&self) -> Vec<&str> {
        self.selected_technologies
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Problems the query carries but that are not rejected before sending.
    pub fn warnings(&self) -> Vec<QueryWarning> {
        let mut warnings = Vec::new();
        if let (Some(min), Some(max)) = (self.min_experience, self.max_experience) {
            if min > max {
                warnings.push(QueryWarning::InvertedExperienceRange { min, max });
            }
        }
        warnings
    }
}

/// Suspicious query shapes that are sent anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryWarning {
    InvertedExperienceRange { min: u32, max: u32 },
}

impl std::fmt::Display for QueryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryWarning::InvertedExperienceRange { min, max } => {
                write!(f, "minExperience ({min}) is greater than maxExperience ({max})")
            }
        }
    }
}

/// Backend protocol used for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// One free-text query matched against all fields.
    SimpleOr,
    /// Structured filters, any field may match.
    CrossFieldOr,
    /// Comma-separated terms or several technologies, all must match.
    CommaAnd,
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QueryMode::SimpleOr => "simple-or",
            QueryMode::CrossFieldOr => "cross-field-or",
            QueryMode::CommaAnd => "comma-and",
        };
        f.write_str(name)
    }
}

/// Page metadata for a result set.
///
/// `current_page < total_pages` unless `total_pages == 0`, in which case
/// `current_page == 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_results: u64,
    pub current_page: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// Build pagination, clamping the current page into range.
    pub fn new(total_results: u64, current_page: u32, total_pages: u32) -> Self {
        let current_page = if total_pages == 0 {
            0
        } else {
            current_page.min(total_pages - 1)
        };
        Self {
            total_results,
            current_page,
            total_pages,
        }
    }

    /// A single page holding `len` results.
    pub fn single_page(len: usize) -> Self {
        Self::new(len as u64, 0, 1)
    }
}

/// The one record shape every rendering surface consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCandidate {
    pub id: String,
    pub name: String,
    pub image: String,
    pub role: String,
    pub location: String,
    pub rating: f64,
    pub reviews: u32,
    pub rate: String,
    pub skills: Vec<String>,
    pub experience: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
}

/// Where the candidates of a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Primary,
    Secondary,
    Synthetic,
}

/// Outcome of one search. Replaces any earlier result wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub candidates: Vec<CanonicalCandidate>,
    pub pagination: Pagination,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degradation_reason: Option<String>,
    pub mode: QueryMode,
    pub source: ResultSource,
}

impl SearchResult {
    /// True for a live, well-formed response that matched nothing.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// True when an optional filter carries no usable value.
pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Errors raised below the fallback chain.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SearchError {
    /// Short label used in degradation reasons and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::Network(_) => "network error",
            SearchError::Http { .. } => "HTTP error",
            SearchError::InvalidConfig(_) => "configuration error",
            SearchError::Json(_) => "malformed JSON",
        }
    }
}

/// Convenience result type.
pub type TalentResult<T> = Result<T, SearchError>;
