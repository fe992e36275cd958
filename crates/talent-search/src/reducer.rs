//! Immutable query updates.
//!
//! Surfaces keep one [`SearchQuery`] value and derive the next one from user
//! actions. Any change other than paging returns to the first page.

use crate::types::{MatchLogic, SearchQuery};

/// A user edit to the current query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryAction {
    SetTerm(String),
    AddTechnology(String),
    RemoveTechnology(String),
    ToggleTechnology(String),
    SetDomainExperience(Option<String>),
    SetExperienceRange { min: Option<u32>, max: Option<u32> },
    SetRegion(Option<String>),
    SetCity(Option<String>),
    SetCountry(Option<String>),
    SetAvailability(Option<String>),
    SetCertification(Option<String>),
    SetExplicitMode(Option<MatchLogic>),
    SetPage(u32),
    SetPageSize(u32),
    /// Drop every structured filter, keep the term.
    ClearFilters,
    /// Back to an empty query, keeping the page size.
    Reset,
}

/// Apply `action` to `query`, returning the next query.
pub fn reduce(query: &SearchQuery, action: QueryAction) -> SearchQuery {
    let mut next = query.clone();
    let mut keep_page = false;

    match action {
        QueryAction::SetTerm(term) => next.raw_term = term,
        QueryAction::AddTechnology(tech) => add_technology(&mut next, tech),
        QueryAction::RemoveTechnology(tech) => remove_technology(&mut next, &tech),
        QueryAction::ToggleTechnology(tech) => {
            if has_technology(&next, &tech) {
                remove_technology(&mut next, &tech);
            } else {
                add_technology(&mut next, tech);
            }
        }
        QueryAction::SetDomainExperience(v) => next.domain_experience = clean(v),
        QueryAction::SetExperienceRange { min, max } => {
            next.min_experience = min;
            next.max_experience = max;
        }
        QueryAction::SetRegion(v) => next.region = clean(v),
        QueryAction::SetCity(v) => next.city = clean(v),
        QueryAction::SetCountry(v) => next.country = clean(v),
        QueryAction::SetAvailability(v) => next.availability = clean(v),
        QueryAction::SetCertification(v) => next.certification = clean(v),
        QueryAction::SetExplicitMode(m) => next.explicit_mode = m,
        QueryAction::SetPage(page) => {
            next.page = page;
            keep_page = true;
        }
        QueryAction::SetPageSize(size) => next.size = size.max(1),
        QueryAction::ClearFilters => {
            next = SearchQuery {
                raw_term: next.raw_term,
                size: next.size,
                ..SearchQuery::default()
            };
        }
        QueryAction::Reset => {
            next = SearchQuery {
                size: next.size,
                ..SearchQuery::default()
            };
        }
    }

    if !keep_page {
        next.page = 0;
    }
    next
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn has_technology(query: &SearchQuery, tech: &str) -> bool {
    query
        .selected_technologies
        .iter()
        .any(|t| t.eq_ignore_ascii_case(tech.trim()))
}

fn add_technology(query: &mut SearchQuery, tech: String) {
    let tech = tech.trim();
    if !tech.is_empty() && !has_technology(query, tech) {
        query.selected_technologies.push(tech.to_string());
    }
}

fn remove_technology(query: &mut SearchQuery, tech: &str) {
    let tech = tech.trim();
    query
        .selected_technologies
        .retain(|t| !t.eq_ignore_ascii_case(tech));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::select_mode;
    use crate::types::QueryMode;

    #[test]
    fn test_reduce_leaves_input_untouched() {
        let before = SearchQuery::term("Sarah");
        let after = reduce(&before, QueryAction::SetCity(Some("Oslo".into())));
        assert_eq!(before.city, None);
        assert_eq!(after.city.as_deref(), Some("Oslo"));
    }

    #[test]
    fn test_technologies_dedupe_and_toggle() {
        let mut q = SearchQuery::default();
        q = reduce(&q, QueryAction::AddTechnology("Appian".into()));
        q = reduce(&q, QueryAction::AddTechnology(" appian ".into()));
        assert_eq!(q.selected_technologies, vec!["Appian"]);
        assert_eq!(select_mode(&q), QueryMode::CrossFieldOr);

        q = reduce(&q, QueryAction::ToggleTechnology("Mendix".into()));
        assert_eq!(select_mode(&q), QueryMode::CommaAnd);

        q = reduce(&q, QueryAction::ToggleTechnology("APPIAN".into()));
        assert_eq!(q.selected_technologies, vec!["Mendix"]);

        q = reduce(&q, QueryAction::RemoveTechnology("mendix".into()));
        assert!(q.selected_technologies.is_empty());
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let q = reduce(&SearchQuery::term("x"), QueryAction::SetPage(4));
        assert_eq!(q.page, 4);
        let q = reduce(&q, QueryAction::SetRegion(Some("EMEA".into())));
        assert_eq!(q.page, 0);
    }

    #[test]
    fn test_blank_filter_values_clear() {
        let q = reduce(&SearchQuery::default(), QueryAction::SetCountry(Some("  ".into())));
        assert_eq!(q.country, None);
    }

    #[test]
    fn test_clear_filters_and_reset() {
        let mut q = SearchQuery::term("Pega");
        q = reduce(&q, QueryAction::SetPageSize(50));
        q = reduce(&q, QueryAction::AddTechnology("Pega".into()));
        q = reduce(&q, QueryAction::SetExperienceRange { min: Some(2), max: Some(9) });

        let cleared = reduce(&q, QueryAction::ClearFilters);
        assert_eq!(cleared.raw_term, "Pega");
        assert!(cleared.selected_technologies.is_empty());
        assert_eq!(cleared.min_experience, None);
        assert_eq!(cleared.size, 50);

        let reset = reduce(&q, QueryAction::Reset);
        assert_eq!(reset, SearchQuery { size: 50, ..SearchQuery::default() });
    }
}
