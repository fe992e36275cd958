//! Request building for each query mode.
//!
//! Blank fields are never sent: the backend treats an empty filter as
//! "match the empty string".

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{is_blank, QueryMode, SearchQuery};

pub const SIMPLE_OR_PATH: &str = "/candidates/simple-or-search";
pub const CROSS_FIELD_PATH: &str = "/candidates/search";
pub const COMMA_AND_PATH: &str = "/candidates/search/comma-and";
pub const COMMA_SIMPLE_PATH: &str = "/candidates/search/comma-simple";
pub const FILTER_OPTIONS_PATH: &str = "/candidates/filter-options";

/// HTTP verb of a request spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

/// Transport-independent description of one backend call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpRequestSpec {
    pub method: HttpMethod,
    /// Path relative to the API base, e.g. `/candidates/search`.
    pub path: String,
    /// Query-string pairs, in send order.
    pub query: Vec<(String, String)>,
    /// JSON body for POST requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl HttpRequestSpec {
    fn get(path: &str, query: Vec<(String, String)>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.to_string(),
            query,
            body: None,
        }
    }

    /// Value of a query parameter, if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Path plus encoded query string, for display and logs.
    pub fn display_target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let qs = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{qs}", self.path)
    }
}

/// Ordered collection of non-blank parameters.
#[derive(Default)]
struct Params(Vec<(String, String)>);

impl Params {
    fn text(&mut self, key: &str, value: &str) -> &mut Self {
        let value = value.trim();
        if !value.is_empty() {
            self.0.push((key.to_string(), value.to_string()));
        }
        self
    }

    fn opt(&mut self, key: &str, value: &Option<String>) -> &mut Self {
        if !is_blank(value) {
            self.text(key, value.as_deref().unwrap_or_default());
        }
        self
    }

    fn num(&mut self, key: &str, value: Option<u32>) -> &mut Self {
        if let Some(v) = value {
            self.0.push((key.to_string(), v.to_string()));
        }
        self
    }

    fn page(&mut self, query: &SearchQuery) -> &mut Self {
        self.num("page", Some(query.page)).num("size", Some(query.size))
    }

    fn filters(&mut self, query: &SearchQuery) -> &mut Self {
        self.opt("domainExperience", &query.domain_experience)
            .num("minExperience", query.min_experience)
            .num("maxExperience", query.max_experience)
            .opt("region", &query.region)
            .opt("city", &query.city)
            .opt("country", &query.country)
            .opt("availability", &query.availability)
            .opt("certification", &query.certification)
    }

    fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }

    /// JSON object; numeric parameters stay numbers.
    fn into_json(self, numeric: &[&str]) -> Map<String, Value> {
        self.0
            .into_iter()
            .map(|(k, v)| {
                let value = match v.parse::<u64>() {
                    Ok(n) if numeric.contains(&k.as_str()) => Value::from(n),
                    _ => Value::String(v),
                };
                (k, value)
            })
            .collect()
    }
}

fn joined_technologies(query: &SearchQuery) -> String {
    query.technologies().join(",")
}

/// Build the primary request for a query in the given mode.
pub fn build(query: &SearchQuery, mode: QueryMode) -> HttpRequestSpec {
    match mode {
        QueryMode::SimpleOr => {
            let mut params = Params::default();
            params.text("q", &query.raw_term).page(query);
            HttpRequestSpec::get(SIMPLE_OR_PATH, params.into_pairs())
        }
        QueryMode::CrossFieldOr => {
            let mut params = Params::default();
            params
                .text("q", &query.raw_term)
                .text("technologies", &joined_technologies(query))
                .filters(query)
                .page(query);
            HttpRequestSpec::get(CROSS_FIELD_PATH, params.into_pairs())
        }
        QueryMode::CommaAnd => {
            let mut params = Params::default();
            params
                .text("searchTerm", &query.raw_term)
                .text("technologies", &joined_technologies(query))
                .filters(query)
                .text("searchType", "AND")
                .page(query);
            let body = params.into_json(&["minExperience", "maxExperience", "page", "size"]);
            HttpRequestSpec {
                method: HttpMethod::Post,
                path: COMMA_AND_PATH.to_string(),
                query: Vec::new(),
                body: Some(Value::Object(body)),
            }
        }
    }
}

/// Build the simplified fallback request, when the mode has one.
///
/// Structured filters are dropped. `CrossFieldOr` has no secondary endpoint.
pub fn build_secondary(query: &SearchQuery, mode: QueryMode) -> Option<HttpRequestSpec> {
    match mode {
        QueryMode::CommaAnd => {
            let mut params = Params::default();
            params
                .text("q", &query.raw_term)
                .text("technologies", &joined_technologies(query))
                .page(query);
            Some(HttpRequestSpec::get(COMMA_SIMPLE_PATH, params.into_pairs()))
        }
        QueryMode::SimpleOr => {
            let mut params = Params::default();
            params.text("q", &query.raw_term).page(query);
            Some(HttpRequestSpec::get(CROSS_FIELD_PATH, params.into_pairs()))
        }
        QueryMode::CrossFieldOr => None,
    }
}

/// Request for the filter metadata endpoint.
pub fn filter_options() -> HttpRequestSpec {
    HttpRequestSpec::get(FILTER_OPTIONS_PATH, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    #[test]
    fn test_simple_or_request() {
        let spec = build(&SearchQuery::term("Sarah"), QueryMode::SimpleOr);
        assert_eq!(spec.method, HttpMethod::Get);
        assert_eq!(spec.path, SIMPLE_OR_PATH);
        assert_eq!(spec.param("q"), Some("Sarah"));
        assert_eq!(spec.param("page"), Some("0"));
        assert_eq!(spec.param("size"), Some("20"));
        assert!(spec.body.is_none());
        assert_eq!(spec.display_target(), "/candidates/simple-or-search?q=Sarah&page=0&size=20");
    }

    #[test]
    fn test_simple_or_omits_blank_term() {
        let spec = build(&SearchQuery::term("   "), QueryMode::SimpleOr);
        assert_eq!(spec.param("q"), None);
    }

    #[test]
    fn test_cross_field_request_joins_and_omits() {
        let query = SearchQuery {
            raw_term: "".into(),
            selected_technologies: vec!["Appian".into()],
            domain_experience: Some("Insurance".into()),
            min_experience: Some(2),
            city: Some("".into()),
            country: Some("Germany".into()),
            page: 3,
            size: 10,
            ..SearchQuery::default()
        };
        let spec = build(&query, QueryMode::CrossFieldOr);
        assert_eq!(spec.path, CROSS_FIELD_PATH);
        let keys: Vec<&str> = spec.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["technologies", "domainExperience", "minExperience", "country", "page", "size"]
        );
        assert_eq!(spec.param("technologies"), Some("Appian"));
        assert_eq!(spec.param("page"), Some("3"));
    }

    #[test]
    fn test_cross_field_multi_valued_technologies() {
        let query = SearchQuery {
            selected_technologies: vec!["Appian".into(), "Mendix".into()],
            ..SearchQuery::default()
        };
        let spec = build(&query, QueryMode::CrossFieldOr);
        assert_eq!(spec.param("technologies"), Some("Appian,Mendix"));
    }

    #[test]
    fn test_comma_and_body() {
        let query = SearchQuery {
            raw_term: "Appian, Mendix".into(),
            selected_technologies: vec!["Pega".into(), "OutSystems".into()],
            max_experience: Some(8),
            region: Some("  ".into()),
            ..SearchQuery::default()
        };
        let spec = build(&query, QueryMode::CommaAnd);
        assert_eq!(spec.method, HttpMethod::Post);
        assert_eq!(spec.path, COMMA_AND_PATH);
        assert!(spec.query.is_empty());
        assert_json_eq!(
            spec.body.unwrap(),
            json!({
                "searchTerm": "Appian, Mendix",
                "technologies": "Pega,OutSystems",
                "maxExperience": 8,
                "searchType": "AND",
                "page": 0,
                "size": 20
            })
        );
    }

    #[test]
    fn test_comma_and_keeps_numeric_looking_terms_as_strings() {
        let query = SearchQuery {
            raw_term: "7, 8".into(),
            certification: Some("2024".into()),
            ..SearchQuery::default()
        };
        let body = build(&query, QueryMode::CommaAnd).body.unwrap();
        assert_eq!(body["certification"], json!("2024"));
        assert_eq!(body["searchTerm"], json!("7, 8"));
    }

    #[test]
    fn test_secondary_requests() {
        let query = SearchQuery {
            raw_term: "Appian, Mendix".into(),
            city: Some("Paris".into()),
            ..SearchQuery::default()
        };
        let comma = build_secondary(&query, QueryMode::CommaAnd).unwrap();
        assert_eq!(comma.path, COMMA_SIMPLE_PATH);
        assert_eq!(comma.param("q"), Some("Appian, Mendix"));
        assert_eq!(comma.param("city"), None);

        let simple = build_secondary(&SearchQuery::term("Sarah"), QueryMode::SimpleOr).unwrap();
        assert_eq!(simple.path, CROSS_FIELD_PATH);
        assert_eq!(simple.param("q"), Some("Sarah"));

        assert!(build_secondary(&query, QueryMode::CrossFieldOr).is_none());
    }

    #[test]
    fn test_filter_options_request() {
        let spec = filter_options();
        assert_eq!(spec.method, HttpMethod::Get);
        assert_eq!(spec.path, FILTER_OPTIONS_PATH);
        assert!(spec.query.is_empty());
    }
}
