//! Async HTTP transport wrapping reqwest.
//!
//! One attempt per call: retrying is the fallback chain's job, not the
//! transport's. Non-2xx statuses become [`SearchError::Http`]; connection,
//! timeout and body-read failures become [`SearchError::Network`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::request::{HttpMethod, HttpRequestSpec};
use crate::types::{SearchError, TalentResult};

/// Default request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Longest error body kept on an [`SearchError::Http`].
const MAX_ERROR_BODY: usize = 512;

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// Parsed JSON body; `Value::Null` when the body was empty or not JSON.
    pub body: Value,
}

impl RawResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }
}

/// Sends request specs to the search backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one request. Never fails for a 2xx response.
    async fn send(&self, spec: &HttpRequestSpec) -> TalentResult<RawResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, spec: &HttpRequestSpec) -> TalentResult<RawResponse> {
        (**self).send(spec).await
    }
}

/// Supplies the bearer token for authenticated calls.
///
/// Session lifecycle lives outside this crate; implementors only hand over
/// whatever token is current.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token, e.g. from a flag or environment variable.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        let token = self.0.trim();
        (!token.is_empty()).then(|| token.to_string())
    }
}

/// reqwest-backed transport rooted at an API base URL.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    tokens: Option<Arc<dyn TokenProvider>>,
}

impl HttpTransport {
    /// Create a transport for `base_url` (e.g. `http://localhost:8080/api`).
    pub fn new(base_url: &str, timeout_ms: u64) -> TalentResult<Self> {
        let base = url::Url::parse(base_url).map_err(|e| {
            SearchError::InvalidConfig(format!("bad API base URL {base_url:?}: {e}"))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(SearchError::InvalidConfig(format!(
                "API base URL must be http(s): {base_url}"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(concat!("talent-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens: None,
        })
    }

    /// Attach a bearer token source.
    pub fn with_token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, spec: &HttpRequestSpec) -> String {
        format!("{}{}", self.base_url, spec.path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, spec: &HttpRequestSpec) -> TalentResult<RawResponse> {
        let url = self.url_for(spec);

        let mut builder = match spec.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        builder = builder.header(reqwest::header::ACCEPT, "application/json");
        if !spec.query.is_empty() {
            builder = builder.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            builder = builder.json(body);
        }
        if let Some(token) = self.tokens.as_ref().and_then(|t| t.bearer_token()) {
            builder = builder.bearer_auth(token);
        }

        tracing::debug!("{:?} {}", spec.method, spec.display_target());

        let resp = builder
            .send()
            .await
            .map_err(|e| SearchError::Network(format!("{url}: {e}")))?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| SearchError::Network(format!("{url}: failed to read body: {e}")))?;

        if !(200..300).contains(&status) {
            let mut body = text;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(SearchError::Http { status, body });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::debug!("{url}: 2xx body is not JSON ({e}), treating as empty");
                Value::Null
            })
        };

        Ok(RawResponse { status, body })
    }
}
