//! JSON-over-HTTP transport shared by both API clients.
//!
//! - HTTP client tuning (pooling, timeouts)
//! - Read retries with exponential backoff and jitter
//! - Observability (tracing spans, metrics)
//! - Optional request interceptor for credentials

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info_span, Instrument};

use crate::config::StudioConfig;
use crate::error::{StudioError, StudioResult};
use crate::metrics::record_request;
use crate::retry::{with_retry, RetryConfig};

/// Hook applied to every outgoing request before it is sent.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Attaches `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

impl RequestInterceptor for BearerToken {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.0)
    }
}

/// Percent-encode one path segment.
pub fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

/// A base URL plus a tuned `reqwest::Client`.
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    retry: RetryConfig,
    interceptor: Option<Arc<dyn RequestInterceptor>>,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("interceptor", &self.interceptor.is_some())
            .finish()
    }
}

impl RestClient {
    /// Create a client rooted at `base_url` (an API prefix may be included).
    pub fn new(base_url: impl Into<String>, config: &StudioConfig) -> StudioResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("vstudio-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StudioError::Network)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: config.retry.clone(),
            interceptor: None,
        })
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =========================================================================
    // JSON helpers
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(&self, operation: &str, path: &str) -> StudioResult<T> {
        let text = self.send(Method::GET, operation, path, &[], None).await?;
        decode(operation, &text)
    }

    pub async fn post<B, T>(&self, operation: &str, path: &str, body: &B) -> StudioResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let text = self.send(Method::POST, operation, path, &[], Some(&body)).await?;
        decode(operation, &text)
    }

    /// POST without a body, optionally with query parameters.
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> StudioResult<T> {
        let text = self.send(Method::POST, operation, path, query, None).await?;
        decode(operation, &text)
    }

    pub async fn put<B, T>(&self, operation: &str, path: &str, body: &B) -> StudioResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let text = self.send(Method::PUT, operation, path, &[], Some(&body)).await?;
        decode(operation, &text)
    }

    pub async fn patch<B, T>(&self, operation: &str, path: &str, body: &B) -> StudioResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let text = self.send(Method::PATCH, operation, path, &[], Some(&body)).await?;
        decode(operation, &text)
    }

    /// DELETE; any response body is discarded.
    pub async fn delete(&self, operation: &str, path: &str) -> StudioResult<()> {
        self.send(Method::DELETE, operation, path, &[], None).await?;
        Ok(())
    }

    // =========================================================================
    // Request execution
    // =========================================================================

    async fn send(
        &self,
        method: Method,
        operation: &str,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> StudioResult<String> {
        if method == Method::GET {
            with_retry(&self.retry, operation, || {
                self.send_once(&method, operation, path, query, body)
            })
            .await
        } else {
            self.send_once(&method, operation, path, query, body).await
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        operation: &str,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> StudioResult<String> {
        let url = self.url(path);
        let span = info_span!("studio_request", operation = %operation, method = %method, path = %path);

        let start = Instant::now();
        let result = async {
            let mut request = self.http.request(method.clone(), &url);
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }
            if let Some(interceptor) = &self.interceptor {
                request = interceptor.intercept(request);
            }

            let response = request.send().await.map_err(StudioError::from_reqwest)?;
            let status = response.status();
            let retry_after = retry_after_ms(response.headers());
            let text = response.text().await.map_err(StudioError::from_reqwest)?;

            if status.is_success() {
                debug!(status = status.as_u16(), bytes = text.len(), "Request succeeded");
                Ok(text)
            } else {
                Err(StudioError::from_http_response(status.as_u16(), text, retry_after))
            }
        }
        .instrument(span)
        .await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.http_status().unwrap_or(0),
        };
        record_request(operation, status, latency_ms);

        result
    }
}

/// Decode a response body; an empty body decodes as JSON `null`.
fn decode<T: DeserializeOwned>(operation: &str, text: &str) -> StudioResult<T> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| {
        StudioError::invalid_response(format!("{} returned an unexpected payload: {}", operation, e))
    })
}
