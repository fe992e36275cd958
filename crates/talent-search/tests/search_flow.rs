//! End-to-end search flows against a mock backend.
//!
//! Covers each query protocol on the wire, the fallback order, envelope
//! handling, bearer auth and filter metadata.

use std::sync::Arc;

use assert_json_diff::assert_json_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use talent_search::mock::covers_all;
use talent_search::*;

// ─────────────────────── helpers ───────────────────────

fn engine_for(server: &MockServer) -> SearchEngine<HttpTransport> {
    let transport = HttpTransport::new(&format!("{}/api", server.uri()), 2_000).unwrap();
    SearchEngine::new(transport).with_seed(2024)
}

fn page(content: Value, total: u64, number: u64, pages: u64) -> Value {
    json!({
        "content": content,
        "totalElements": total,
        "number": number,
        "totalPages": pages
    })
}

// ═══════════════════════════════════════════════════════
// PROTOCOLS
// ═══════════════════════════════════════════════════════

/// Scenario A: comma-separated term goes out as an AND POST.
#[tokio::test]
async fn test_comma_term_posts_and_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/candidates/search/comma-and"))
        .and(body_json(json!({
            "searchTerm": "Appian, Mendix",
            "searchType": "AND",
            "page": 0,
            "size": 20
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": {
                "content": [
                    {
                        "id": 1,
                        "name": "Ana",
                        "technologies": ["Appian", "Mendix"],
                        "totalExperienceYears": 5
                    }
                ],
                "totalElements": 1,
                "number": 0,
                "totalPages": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = engine_for(&server).search(&SearchQuery::term("Appian, Mendix")).await;

    assert_eq!(result.mode, QueryMode::CommaAnd);
    assert!(!result.degraded);
    assert_eq!(result.source, ResultSource::Primary);
    assert_eq!(result.pagination, Pagination::new(1, 0, 1));
    let ana = &result.candidates[0];
    assert_eq!(ana.id, "1");
    assert_eq!(ana.role, "Appian Developer");
    assert_eq!(ana.rate, "$100");
}

/// Scenario B: a bare term hits the simple OR endpoint.
#[tokio::test]
async fn test_plain_term_uses_simple_or() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/candidates/simple-or-search"))
        .and(query_param("q", "Sarah"))
        .and(query_param("page", "0"))
        .and(query_param("size", "20"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "s-1", "name": "Sarah Lee", "skills": ["Pega"]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let result = engine_for(&server).search(&SearchQuery::term("Sarah")).await;

    assert_eq!(result.mode, QueryMode::SimpleOr);
    assert_eq!(result.candidates.len(), 1);
    assert_eq!(result.candidates[0].name, "Sarah Lee");
    assert_eq!(result.pagination, Pagination::new(1, 0, 1));
}

#[tokio::test]
async fn test_filters_use_cross_field_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/candidates/search"))
        .and(query_param("technologies", "OutSystems"))
        .and(query_param("country", "Portugal"))
        .and(query_param("minExperience", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 4, "city": "Porto", "country": "Portugal"}],
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery {
        selected_technologies: vec!["OutSystems".into()],
        country: Some("Portugal".into()),
        city: Some("".into()),
        min_experience: Some(3),
        ..SearchQuery::default()
    };
    let result = engine_for(&server).search(&query).await;

    assert_eq!(result.mode, QueryMode::CrossFieldOr);
    assert_eq!(result.candidates[0].location, "Porto, Portugal");

    let requests = server.received_requests().await.unwrap();
    let url = &requests[0].url;
    assert!(url.query_pairs().all(|(k, _)| k != "city" && k != "q"), "{url}");
}

// ═══════════════════════════════════════════════════════
// ENVELOPES
// ═══════════════════════════════════════════════════════

/// Scenario C: an empty page is "no results", not a failure.
#[tokio::test]
async fn test_empty_page_is_not_degraded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/candidates/simple-or-search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([]), 0, 0, 0)))
        .mount(&server)
        .await;

    let result = engine_for(&server).search(&SearchQuery::term("Nobody")).await;

    assert!(result.candidates.is_empty());
    assert!(!result.degraded);
    assert_eq!(result.degradation_reason, None);
    assert_eq!(result.pagination.total_results, 0);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_json_success_is_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/candidates/simple-or-search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = engine_for(&server).search(&SearchQuery::term("x")).await;

    assert!(!result.degraded);
    assert!(result.candidates.is_empty());
}

#[tokio::test]
async fn test_each_shape_reports_total() {
    let shapes = [
        (json!({"results": page(json!([{}, {}]), 12, 0, 6)}), 12),
        (page(json!([{}, {}, {}]), 30, 1, 10), 30),
        (json!([{}, {}, {}, {}]), 4),
        (json!({"results": [{}], "total": 7}), 7),
    ];
    for (body, total) in shapes {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        let result = engine_for(&server).search(&SearchQuery::term("any")).await;
        assert_eq!(result.pagination.total_results, total);
        let mut ids: Vec<&str> = result.candidates.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), result.candidates.len());
    }
}

// ═══════════════════════════════════════════════════════
// FALLBACK
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_comma_and_falls_back_to_comma_simple() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/candidates/search/comma-and"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/candidates/search/comma-simple"))
        .and(query_param("technologies", "Appian,Mendix"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([{"id": 8, "technologies": "Appian, Mendix"}]),
            1,
            0,
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery {
        selected_technologies: vec!["Appian".into(), "Mendix".into()],
        region: Some("Europe".into()),
        ..SearchQuery::default()
    };
    let result = engine_for(&server).search(&query).await;

    assert!(!result.degraded);
    assert_eq!(result.source, ResultSource::Secondary);
    assert_eq!(result.candidates[0].skills, vec!["Appian", "Mendix"]);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method.as_str(), "POST");
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_json_eq!(
        sent,
        json!({
            "technologies": "Appian,Mendix",
            "region": "Europe",
            "searchType": "AND",
            "page": 0,
            "size": 20
        })
    );
}

/// Scenario D: every endpoint down yields AND-filtered sample profiles.
#[tokio::test]
async fn test_all_endpoints_down_returns_degraded_and_filtered_mock() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let query = SearchQuery::term("Appian, Mendix");
    let result = engine_for(&server).search(&query).await;

    assert!(result.degraded);
    assert_eq!(result.source, ResultSource::Synthetic);
    assert!(!result.candidates.is_empty());
    let required = required_terms(&query);
    for c in &result.candidates {
        assert!(covers_all(&c.skills, &required), "{:?}", c.skills);
    }
    let reason = result.degradation_reason.unwrap();
    assert!(reason.contains("primary (HTTP error)"), "{reason}");
    assert!(reason.contains("secondary (HTTP error)"), "{reason}");
}

#[tokio::test]
async fn test_connection_refused_is_degraded_not_fatal() {
    // Bind then drop a listener so its port refuses connections.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let transport = HttpTransport::new(&format!("http://127.0.0.1:{port}/api"), 500).unwrap();
    let engine = SearchEngine::new(transport).with_seed(1);

    let query = SearchQuery {
        selected_technologies: vec!["Pega".into(), "Java".into()],
        ..SearchQuery::default()
    };
    let result = engine.search(&query).await;

    assert!(result.degraded);
    assert!(!result.candidates.is_empty());
    assert!(result
        .degradation_reason
        .as_deref()
        .unwrap_or_default()
        .contains("network error"));
    for c in &result.candidates {
        assert!(covers_all(&c.skills, &["Pega".to_string(), "Java".to_string()]));
    }
}

// ═══════════════════════════════════════════════════════
// AUTH & METADATA
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&format!("{}/api", server.uri()), 2_000)
        .unwrap()
        .with_token_provider(Arc::new(StaticToken("s3cret".into())));
    let result = SearchEngine::new(transport).search(&SearchQuery::term("x")).await;

    assert!(!result.degraded);
}

#[tokio::test]
async fn test_filter_options_from_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/candidates/filter-options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "technologies": ["Appian", "Mendix"],
            "countries": ["Spain"]
        })))
        .mount(&server)
        .await;

    let options = engine_for(&server).filter_options().await;

    assert_eq!(options.technologies, vec!["Appian", "Mendix"]);
    assert_eq!(options.countries, vec!["Spain"]);
    assert!(options.cities.is_empty());
}

#[tokio::test]
async fn test_filter_options_fall_back_when_backend_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let options = engine_for(&server).filter_options().await;

    assert!(options.technologies.iter().any(|t| t == "Mendix"));
}
