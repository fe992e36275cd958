//! Query mode selection.
//!
//! Exactly one backend protocol is used per search. Comma-separated terms or
//! more than one selected technology always mean AND matching; otherwise any
//! advanced filter routes to the structured cross-field endpoint, and a bare
//! term goes to the simple OR endpoint.

use crate::types::{is_blank, QueryMode, SearchQuery};

/// Pick the protocol for a query. Pure and deterministic.
pub fn select_mode(query: &SearchQuery) -> QueryMode {
    if has_comma_terms(query) || query.selected_technologies.len() > 1 {
        return QueryMode::CommaAnd;
    }

    if has_advanced_filters(query) {
        return QueryMode::CrossFieldOr;
    }

    QueryMode::SimpleOr
}

fn has_comma_terms(query: &SearchQuery) -> bool {
    query.raw_term.contains(',') && query.raw_term.trim().chars().count() >= 2
}

fn has_advanced_filters(query: &SearchQuery) -> bool {
    !query.selected_technologies.is_empty()
        || !is_blank(&query.domain_experience)
        || query.min_experience.is_some()
        || query.max_experience.is_some()
        || !is_blank(&query.region)
        || !is_blank(&query.city)
        || !is_blank(&query.country)
}

/// Terms that must all match under AND semantics.
///
/// Every selected technology, plus each comma-separated part of the raw term
/// when it contains a comma. Deduplicated case-insensitively, first spelling
/// wins.
pub fn required_terms(query: &SearchQuery) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();

    let comma_parts = query
        .raw_term
        .contains(',')
        .then(|| split_terms(&query.raw_term))
        .unwrap_or_default();

    for term in query.technologies().into_iter().chain(comma_parts) {
        if !terms.iter().any(|t| t.eq_ignore_ascii_case(term)) {
            terms.push(term.to_string());
        }
    }

    terms
}

/// Split a comma-joined term list into trimmed, non-empty parts.
pub(crate) fn split_terms(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}
