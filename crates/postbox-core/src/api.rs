//! HTTP client for the messaging server endpoints.
//!
//! Every call is single-shot: no retries, no client-side timeout. Bounding the
//! wait is the caller's job (the page runtime wraps workflows in its own
//! timeout and cancellation).

use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::Config;

/// Standard User-Agent header for postbox requests.
pub const USER_AGENT: &str = concat!("postbox/", env!("CARGO_PKG_VERSION"));

/// Server used when neither env nor config names one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Environment variable overriding the configured base URL.
pub const BASE_URL_ENV: &str = "POSTBOX_BASE_URL";

/// Resolves the base URL with precedence: env > config > default.
pub fn resolve_base_url(config_base_url: Option<&str>) -> Result<String> {
    if let Ok(env_url) = std::env::var(BASE_URL_ENV) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    if let Some(config_url) = config_base_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    Ok(DEFAULT_BASE_URL.to_string())
}

fn validate_url(url: &str) -> Result<()> {
    Url::parse(url).with_context(|| format!("Invalid base URL: {url}"))?;
    Ok(())
}

/// Categories of API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Server answered with a non-success status
    HttpStatus,
    /// Request timed out
    Timeout,
    /// Connection refused, reset, DNS failure...
    Network,
    /// Response body did not have the expected shape
    Parse,
    /// Endpoint URL could not be built
    InvalidUrl,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::InvalidUrl => write!(f, "invalid_url"),
        }
    }
}

/// Structured error from an endpoint call.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// HTTP status, when the server answered
    pub status: Option<u16>,
    /// Raw error body, when there was one
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn http_status(status: u16, body: &str) -> Self {
        Self {
            kind: ApiErrorKind::HttpStatus,
            message: format!("HTTP {status}"),
            status: Some(status),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    /// True when the server answered but refused (4xx/5xx).
    pub fn is_http_status(&self) -> bool {
        self.kind == ApiErrorKind::HttpStatus
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for endpoint calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

fn classify_reqwest_error(e: &reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::new(ApiErrorKind::Timeout, format!("Request timed out: {e}"))
    } else if e.is_connect() {
        ApiError::new(ApiErrorKind::Network, format!("Connection failed: {e}"))
    } else {
        ApiError::new(ApiErrorKind::Network, format!("Network error: {e}"))
    }
}

/// Body of `GET /get_user_id/{username}`.
#[derive(Debug, Deserialize)]
struct UserIdResponse {
    user_id: Value,
}

/// Outcome of a classic form submission (full-page navigation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResponse {
    pub status: u16,
    /// Final URL after redirects
    pub url: String,
}

/// Client for the messaging server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("Invalid base URL: {base_url}"))?;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { base, http })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = resolve_base_url(config.base_url.as_deref())?;
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Builds an endpoint URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::new(
                    ApiErrorKind::InvalidUrl,
                    format!("Base URL cannot take a path: {}", self.base),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolves a site-relative path such as `/send_message/42`.
    pub fn url_for(&self, path: &str) -> ApiResult<Url> {
        let segments: Vec<&str> = path
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        self.endpoint(&segments)
    }

    /// `GET /get_user_id/{username}` -> the user's id.
    ///
    /// Numeric ids are accepted and returned in their decimal form. Empty,
    /// zero, negative and fractional ids are rejected as unparseable.
    pub async fn get_user_id(&self, username: &str) -> ApiResult<String> {
        let url = self.endpoint(&["get_user_id", username])?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::http_status(status.as_u16(), &body));
        }

        let body: UserIdResponse = response
            .json()
            .await
            .map_err(|e| ApiError::parse(format!("Invalid user id response: {e}")))?;
        match body.user_id {
            Value::String(id) if !id.is_empty() => Ok(id),
            Value::Number(id) if id.as_u64().is_some_and(|n| n > 0) => Ok(id.to_string()),
            other => Err(ApiError::parse(format!("Unexpected user_id value: {other}"))),
        }
    }

    /// `POST /mark_read/{message_id}`; success is status-only.
    pub async fn mark_read(&self, message_id: &str) -> ApiResult<()> {
        let url = self.endpoint(&["mark_read", message_id])?;
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::http_status(status.as_u16(), &body))
        }
    }

    /// `GET /logout`. Any HTTP answer counts as done; returns the status.
    pub async fn logout(&self) -> ApiResult<u16> {
        let url = self.endpoint(&["logout"])?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        Ok(response.status().as_u16())
    }

    /// `POST /login` form. Returns the JSON body when the server sent one.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Option<Value>> {
        let url = self.endpoint(&["login"])?;
        let response = self
            .http
            .post(url)
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ApiError::http_status(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body).ok())
    }

    /// `POST /register` form.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> ApiResult<()> {
        let url = self.endpoint(&["register"])?;
        let response = self
            .http
            .post(url)
            .form(&[("username", username), ("email", email), ("password", password)])
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::http_status(status.as_u16(), &body))
        }
    }

    /// Submits a form to `action` the way a browser would.
    ///
    /// The response is a full page; only its status and final URL are kept.
    pub async fn submit_form(
        &self,
        action: &str,
        fields: &[(String, String)],
    ) -> ApiResult<FormResponse> {
        let url = self.url_for(action)?;
        let response = self
            .http
            .post(url)
            .form(fields)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        Ok(FormResponse {
            status: response.status().as_u16(),
            url: response.url().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        let url = client.endpoint(&["get_user_id", "bob smith/x"]).unwrap();
        assert_eq!(url.path(), "/get_user_id/bob%20smith%2Fx");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let client = ApiClient::new("http://localhost:5000/app/").unwrap();
        let url = client.url_for("/send_message/42").unwrap();
        assert_eq!(url.path(), "/app/send_message/42");
    }

    #[test]
    fn test_resolve_base_url_rejects_garbage_config() {
        // Only meaningful when the env override is absent.
        if std::env::var(BASE_URL_ENV).is_ok() {
            return;
        }
        assert!(resolve_base_url(Some("not a url")).is_err());
        assert_eq!(resolve_base_url(Some("  ")).unwrap(), DEFAULT_BASE_URL);
        assert_eq!(resolve_base_url(None).unwrap(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_get_user_id_string_and_numeric() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_user_id/bob"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user_id": "42"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/get_user_id/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user_id": 7
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        assert_eq!(client.get_user_id("bob").await.unwrap(), "42");
        assert_eq!(client.get_user_id("alice").await.unwrap(), "7");
    }

    #[tokio::test]
    async fn test_get_user_id_not_found_is_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_user_id/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such user"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = client.get_user_id("ghost").await.unwrap_err();
        assert!(err.is_http_status());
        assert_eq!(err.status, Some(404));
        assert_eq!(err.details.as_deref(), Some("no such user"));
    }

    #[tokio::test]
    async fn test_get_user_id_bad_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_user_id/bob"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = client.get_user_id("bob").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_get_user_id_rejects_falsy_and_non_positive_ids() {
        let server = MockServer::start().await;
        for (name, id) in [
            ("zero", serde_json::json!(0)),
            ("negative", serde_json::json!(-3)),
            ("fraction", serde_json::json!(1.5)),
            ("empty", serde_json::json!("")),
            ("null", Value::Null),
        ] {
            Mock::given(method("GET"))
                .and(path(format!("/get_user_id/{name}")))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "user_id": id })),
                )
                .mount(&server)
                .await;
        }

        let client = ApiClient::new(&server.uri()).unwrap();
        for name in ["zero", "negative", "fraction", "empty", "null"] {
            let err = client.get_user_id(name).await.unwrap_err();
            assert_eq!(err.kind, ApiErrorKind::Parse, "{name}");
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Bind then drop to get a port nobody listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = ApiClient::new(&format!("http://127.0.0.1:{port}")).unwrap();
        let err = client.mark_read("7").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Network);
    }

    #[tokio::test]
    async fn test_mark_read_status_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mark_read/7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/mark_read/8"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        client.mark_read("7").await.unwrap();
        assert!(client.mark_read("8").await.unwrap_err().is_http_status());
    }

    #[tokio::test]
    async fn test_logout_accepts_any_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        assert_eq!(client.logout().await.unwrap(), 500);
    }

    #[tokio::test]
    async fn test_submit_form_posts_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send_message/42"))
            .and(body_string_contains("receiver_name=bob"))
            .and(body_string_contains("message=hi+there"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let fields = vec![
            ("receiver_name".to_string(), "bob".to_string()),
            ("message".to_string(), "hi there".to_string()),
        ];
        let response = client
            .submit_form("/send_message/42", &fields)
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert!(response.url.ends_with("/send_message/42"));
    }
}
