//! Response envelope parsing.
//!
//! The backend has returned four envelope shapes over time. They are tried in
//! a fixed order: the metadata-wrapped page must be checked before the flat
//! page, and the legacy `results` array last, because `results` is also the
//! key of the wrapped page.

use serde_json::{Map, Value};

use crate::transport::RawResponse;
use crate::types::Pagination;

/// Which envelope a response body matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// `{ results: { content, totalElements, number, totalPages } }`
    MetadataPage,
    /// `{ content, totalElements, number, totalPages }`
    FlatPage,
    /// `[ ... ]`
    BareArray,
    /// `{ results: [ ... ], total?, page? }`
    LegacyResults,
    /// Nothing matched; treated as zero results.
    Unrecognized,
}

/// Candidate records and pagination pulled out of an envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEnvelope {
    pub raw_candidates: Vec<Value>,
    pub pagination: Pagination,
    pub shape: EnvelopeShape,
}

impl ParsedEnvelope {
    fn unrecognized() -> Self {
        Self {
            raw_candidates: Vec::new(),
            pagination: Pagination::default(),
            shape: EnvelopeShape::Unrecognized,
        }
    }
}

/// Extract candidates and pagination from any known envelope. Never fails.
pub fn parse(raw: &RawResponse) -> ParsedEnvelope {
    parse_value(&raw.body)
}

/// Same as [`parse`], on a bare JSON value.
pub fn parse_value(body: &Value) -> ParsedEnvelope {
    match body {
        Value::Object(obj) => {
            if let Some(page) = obj.get("results").and_then(Value::as_object) {
                if let Some(parsed) = parse_page(page, EnvelopeShape::MetadataPage) {
                    return parsed;
                }
            }
            if let Some(parsed) = parse_page(obj, EnvelopeShape::FlatPage) {
                return parsed;
            }
            if let Some(results) = obj.get("results").and_then(Value::as_array) {
                return parse_legacy(obj, results);
            }
            ParsedEnvelope::unrecognized()
        }
        Value::Array(items) => ParsedEnvelope {
            raw_candidates: items.clone(),
            pagination: Pagination::single_page(items.len()),
            shape: EnvelopeShape::BareArray,
        },
        _ => ParsedEnvelope::unrecognized(),
    }
}

/// Spring-style page object with a `content` array.
fn parse_page(page: &Map<String, Value>, shape: EnvelopeShape) -> Option<ParsedEnvelope> {
    let content = page.get("content")?.as_array()?;
    let len = content.len() as u64;

    let total = number(page, "totalElements").unwrap_or(len);
    let current = number(page, "number").unwrap_or(0);
    let pages = number(page, "totalPages").unwrap_or_else(|| pages_for(total, len));

    Some(ParsedEnvelope {
        raw_candidates: content.clone(),
        pagination: Pagination::new(total, to_u32(current), to_u32(pages)),
        shape,
    })
}

fn parse_legacy(obj: &Map<String, Value>, results: &[Value]) -> ParsedEnvelope {
    let len = results.len() as u64;
    let total = number(obj, "total").unwrap_or(len).max(len);
    let current = number(obj, "page").unwrap_or(0);
    let pages = number(obj, "totalPages").unwrap_or_else(|| pages_for(total, len).max(1));

    ParsedEnvelope {
        raw_candidates: results.to_vec(),
        pagination: Pagination::new(total, to_u32(current), to_u32(pages)),
        shape: EnvelopeShape::LegacyResults,
    }
}

/// Page count when the backend did not say: `ceil(total / page_len)`.
fn pages_for(total: u64, page_len: u64) -> u64 {
    if total == 0 || page_len == 0 {
        0
    } else {
        total.div_ceil(page_len)
    }
}

/// Read a non-negative integer from an int, float or numeric string field.
fn number(obj: &Map<String, Value>, key: &str) -> Option<u64> {
    let value = match obj.get(key)? {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Some(u);
            }
            n.as_f64()?
        }
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (value.is_finite() && value >= 0.0).then_some(value as u64)
}

fn to_u32(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_json(body: Value) -> ParsedEnvelope {
        parse(&RawResponse::ok(body))
    }

    #[test]
    fn test_metadata_wrapped_page() {
        let parsed = parse_json(json!({
            "results": {
                "content": [{"id": 1}, {"id": 2}],
                "totalElements": 42,
                "number": 1,
                "totalPages": 3
            },
            "searchType": "AND"
        }));
        assert_eq!(parsed.shape, EnvelopeShape::MetadataPage);
        assert_eq!(parsed.raw_candidates.len(), 2);
        assert_eq!(parsed.pagination, Pagination::new(42, 1, 3));
    }

    #[test]
    fn test_flat_page() {
        let parsed = parse_json(json!({
            "content": [{"id": "a"}],
            "totalElements": 11,
            "number": 0,
            "totalPages": 11
        }));
        assert_eq!(parsed.shape, EnvelopeShape::FlatPage);
        assert_eq!(parsed.pagination.total_results, 11);
    }

    #[test]
    fn test_empty_flat_page_is_zero_results() {
        let parsed = parse_json(json!({
            "content": [], "totalElements": 0, "number": 0, "totalPages": 0
        }));
        assert_eq!(parsed.shape, EnvelopeShape::FlatPage);
        assert!(parsed.raw_candidates.is_empty());
        assert_eq!(parsed.pagination, Pagination::default());
    }

    #[test]
    fn test_bare_array() {
        let parsed = parse_json(json!([{"id": 1}, {"id": 2}, {"id": 3}]));
        assert_eq!(parsed.shape, EnvelopeShape::BareArray);
        assert_eq!(parsed.pagination, Pagination::new(3, 0, 1));
    }

    #[test]
    fn test_legacy_results() {
        let parsed = parse_json(json!({"results": [{"id": 1}, {"id": 2}], "total": 9, "page": 2}));
        assert_eq!(parsed.shape, EnvelopeShape::LegacyResults);
        assert_eq!(parsed.pagination.total_results, 9);
        assert_eq!(parsed.pagination.total_pages, 5);
        assert_eq!(parsed.pagination.current_page, 2);

        let bare = parse_json(json!({"results": []}));
        assert_eq!(bare.pagination.total_results, 0);
        assert_eq!(bare.pagination.total_pages, 1);
    }

    #[test]
    fn test_results_object_without_content_is_not_a_page() {
        let parsed = parse_json(json!({"results": {"items": []}}));
        assert_eq!(parsed.shape, EnvelopeShape::Unrecognized);
    }

    #[test]
    fn test_unrecognized_shapes() {
        for body in [json!(null), json!("oops"), json!(17), json!({"data": [1, 2]})] {
            let parsed = parse_json(body);
            assert_eq!(parsed.shape, EnvelopeShape::Unrecognized);
            assert!(parsed.raw_candidates.is_empty());
            assert_eq!(parsed.pagination.total_results, 0);
        }
    }

    #[test]
    fn test_missing_and_odd_metadata() {
        let parsed = parse_json(json!({
            "content": [{}, {}, {}, {}],
            "totalElements": "10",
            "number": 7.0
        }));
        assert_eq!(parsed.pagination.total_results, 10);
        assert_eq!(parsed.pagination.total_pages, 3);
        assert_eq!(parsed.pagination.current_page, 2);

        let negative = parse_json(json!({"content": [{}], "totalElements": -5}));
        assert_eq!(negative.pagination.total_results, 1);
    }
}
