//! Configuration loading and resolution.

/// Development backend, used when nothing else is configured.
pub const DEV_API_URL: &str = "http://localhost:8080/api";

/// Path of the API under a production origin.
pub const API_PATH: &str = "/api";

pub const API_URL_ENV: &str = "TALENT_API_URL";
pub const API_ORIGIN_ENV: &str = "TALENT_API_ORIGIN";
pub const API_TOKEN_ENV: &str = "TALENT_API_TOKEN";

/// Resolve the API base URL.
///
/// Explicit flag, then `TALENT_API_URL`, then `TALENT_API_ORIGIN` with the
/// relative `/api` path appended (production), then the development host.
pub fn resolve_api_url(explicit: Option<&str>) -> String {
    resolve_api_url_with(explicit, |key| std::env::var(key).ok())
}

fn resolve_api_url_with(explicit: Option<&str>, env: impl Fn(&str) -> Option<String>) -> String {
    if let Some(url) = non_blank(explicit.map(String::from)) {
        return url;
    }

    if let Some(url) = non_blank(env(API_URL_ENV)) {
        return url;
    }

    if let Some(origin) = non_blank(env(API_ORIGIN_ENV)) {
        return format!("{}{API_PATH}", origin.trim_end_matches('/'));
    }

    DEV_API_URL.to_string()
}

/// Resolve the bearer token: explicit flag, then `TALENT_API_TOKEN`.
pub fn resolve_token(explicit: Option<&str>) -> Option<String> {
    non_blank(explicit.map(String::from)).or_else(|| non_blank(std::env::var(API_TOKEN_ENV).ok()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
