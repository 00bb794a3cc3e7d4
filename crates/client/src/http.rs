//! Resilient HTTP client for the storefront backend.
//!
//! Wraps `reqwest` with verb-shaped operations, bearer-token attachment, and
//! an explicit retry wrapper: the retry state lives in a
//! [`RequestDescriptor`] owned by the loop, not in transport middleware, so
//! the policy is visible in one place and independent of any client
//! library's extension mechanism.
//!
//! Retries are sequential and per-request. Concurrent requests back off
//! independently; there is no shared rate limiter. Once issued, a request
//! runs to success or retry exhaustion - the only external bound is the
//! transport timeout.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, ErrorBody};
use crate::storage::LocalStorage;

/// Statuses worth retrying: request timeout, server overload/maintenance.
pub const RETRYABLE_STATUS_CODES: [StatusCode; 6] = [
    StatusCode::REQUEST_TIMEOUT,
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Retry/backoff policy for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the initial send.
    pub max_retries: u32,
    /// Base delay; retry `n` waits `base_delay * 2^n`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff delay for the given (1-based) retry attempt.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2_u32.saturating_pow(attempt)
    }
}

/// Everything needed to (re)send one request.
///
/// The attempt counter never exceeds the policy's `max_retries`; once it
/// would, the terminal failure is surfaced unchanged.
#[derive(Debug, Clone)]
struct RequestDescriptor {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    attempt: u32,
}

impl RequestDescriptor {
    fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
            attempt: 0,
        }
    }
}

/// Is this status in the fixed retryable set?
#[must_use]
pub fn is_retryable_status(status: StatusCode) -> bool {
    RETRYABLE_STATUS_CODES.contains(&status)
}

/// Verb-shaped HTTP client with retry/backoff and token attachment.
///
/// Cheap to clone; all clones share one transport and one storage handle.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

#[derive(Debug)]
struct HttpClientInner {
    http: reqwest::Client,
    base_url: Url,
    storage: Arc<LocalStorage>,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Create a client for the configured backend origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails to build.
    pub fn new(config: &ClientConfig, storage: Arc<LocalStorage>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpClientInner {
                http,
                base_url: config.api_url.clone(),
                storage,
                retry: config.retry,
            }),
        })
    }

    // =========================================================================
    // Verb methods
    // =========================================================================

    /// `GET` a path under `/api`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] once retries are exhausted or the failure is
    /// permanent.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(RequestDescriptor::new(Method::GET, path)).await
    }

    /// `GET` with query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] once retries are exhausted or the failure is
    /// permanent.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = RequestDescriptor::new(Method::GET, path);
        request.query = to_owned_query(query);
        self.execute(request).await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] once retries are exhausted or the failure is
    /// permanent.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let mut request = RequestDescriptor::new(Method::POST, path);
        request.body = Some(serde_json::to_value(body)?);
        self.execute(request).await
    }

    /// `PUT` with query parameters and no body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] once retries are exhausted or the failure is
    /// permanent.
    pub async fn put_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = RequestDescriptor::new(Method::PUT, path);
        request.query = to_owned_query(query);
        self.execute(request).await
    }

    /// `PATCH` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] once retries are exhausted or the failure is
    /// permanent.
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let mut request = RequestDescriptor::new(Method::PATCH, path);
        request.body = Some(serde_json::to_value(body)?);
        self.execute(request).await
    }

    /// `DELETE` a path, optionally with query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] once retries are exhausted or the failure is
    /// permanent.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = RequestDescriptor::new(Method::DELETE, path);
        request.query = to_owned_query(query);
        self.execute(request).await
    }

    // =========================================================================
    // Retry loop
    // =========================================================================

    async fn execute<T: DeserializeOwned>(
        &self,
        mut request: RequestDescriptor,
    ) -> Result<T, ApiError> {
        loop {
            let err = match self.send(&request).await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let text = response.text().await?;
                        return parse_body(&text);
                    }

                    let text = response.text().await.unwrap_or_default();
                    let err = ApiError::Http {
                        status,
                        body: ErrorBody::from_text(&text),
                    };
                    if !is_retryable_status(status) {
                        return Err(err);
                    }
                    err
                }
                // Errors out of `send()` never carry a status: they are all
                // no-response failures (connect refusal, timeout, aborted
                // transfer) and therefore retryable.
                Err(transport) => ApiError::Network(transport),
            };

            if request.attempt >= self.inner.retry.max_retries {
                return Err(err);
            }

            request.attempt += 1;
            let delay = self.inner.retry.delay_for(request.attempt);
            debug!(
                method = %request.method,
                path = %request.path,
                attempt = request.attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "retrying request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// One send of the descriptor. The bearer token is read fresh from
    /// storage on every attempt, so a token set mid-retry is picked up.
    async fn send(&self, request: &RequestDescriptor) -> Result<reqwest::Response, reqwest::Error> {
        let mut url = self.inner.base_url.clone();
        url.set_path(&format!("/api{}", request.path));
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        let mut builder = self.inner.http.request(request.method.clone(), url);

        if let Some(token) = self.inner.storage.auth_token() {
            builder = builder.header(
                AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            );
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder.send().await
    }
}

fn to_owned_query(query: &[(&str, String)]) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

/// Decode a response body. Empty bodies decode as JSON `null` so callers
/// expecting `Value` or `Option<T>` still resolve.
fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let slice = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(slice).map_err(ApiError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_status_set() {
        for code in [408, 429, 500, 502, 503, 504] {
            let status = StatusCode::from_u16(code).expect("status");
            assert!(is_retryable_status(status), "{code} should be retryable");
        }
        for code in [400, 401, 403, 404, 409, 422] {
            let status = StatusCode::from_u16(code).expect("status");
            assert!(!is_retryable_status(status), "{code} should not be retryable");
        }
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(8000));
    }

    #[test]
    fn test_descriptor_starts_at_attempt_zero() {
        let request = RequestDescriptor::new(Method::GET, "/cart");
        assert_eq!(request.attempt, 0);
        assert!(request.body.is_none());
    }

    #[test]
    fn test_parse_body_empty_is_null() {
        let value: serde_json::Value = parse_body("").expect("parse");
        assert!(value.is_null());
        let opt: Option<u32> = parse_body("  ").expect("parse");
        assert!(opt.is_none());
    }
}
