use crate::api::response::{extract_error_message, Payload};
use crate::error::{ApiError, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Waits out a backoff delay. Swapped out in tests so retries do not sleep.
pub type DelayFn = Arc<dyn Fn(Duration) -> BoxFuture<'static, ()> + Send + Sync>;

pub fn sleep_delay() -> DelayFn {
    Arc::new(|delay| tokio::time::sleep(delay).boxed())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt` (1-based): `base * 2^(attempt - 2)`, zero for the first.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt < 2 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 2);
        self.base_delay.saturating_mul(factor)
    }
}

/// One call against the backend, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn get(endpoint: &str) -> Self {
        Self {
            method: Method::GET,
            endpoint: endpoint.to_string(),
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn post(endpoint: &str, body: Value) -> Self {
        Self {
            method: Method::POST,
            endpoint: endpoint.to_string(),
            query: Vec::new(),
            body: Some(body),
            timeout: None,
        }
    }

    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Sends requests, classifies failures and retries the transient ones.
#[derive(Clone)]
pub struct RequestExecutor {
    http: reqwest::Client,
    base_url: String,
    default_timeout: Duration,
    retry: RetryPolicy,
    delay: DelayFn,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url)
            .field("default_timeout", &self.default_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl RequestExecutor {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            delay: sleep_delay(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_delay_fn(mut self, delay: DelayFn) -> Self {
        self.delay = delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Run `request`, retrying 429, 5xx and transport failures with exponential backoff.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Payload> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!(
                method = %request.method,
                endpoint = %request.endpoint,
                attempt,
                "sending request"
            );

            match self.send_once(request).await {
                Ok(payload) => return Ok(payload),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    attempt += 1;
                    let delay = self.retry.delay_before(attempt);
                    warn!(
                        endpoint = %request.endpoint,
                        error = %err,
                        next_attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        "request failed, retrying"
                    );
                    (self.delay)(delay).await;
                }
                Err(err) => {
                    debug!(endpoint = %request.endpoint, code = err.code(), "request failed");
                    return Err(err);
                }
            }
        }
    }

    async fn send_once(&self, request: &ApiRequest) -> Result<Payload> {
        let url = format!("{}{}", self.base_url, request.endpoint);
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let call = async {
            let response = builder.send().await.map_err(classify_transport_error)?;
            read_response(response).await
        };

        // Dropping the in-flight future aborts the call.
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::timeout(timeout)),
        }
    }
}

fn classify_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        ApiError::validation(format!("Invalid request: {}", err))
    } else {
        ApiError::network(format!("Network request failed: {}", err))
    }
}

async fn read_response(response: reqwest::Response) -> Result<Payload> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false);
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs);

    let text = response
        .text()
        .await
        .map_err(|e| ApiError::network(format!("Failed to read response body: {}", e)))?;

    if status.is_success() {
        if is_json {
            if text.trim().is_empty() {
                return Ok(Payload::Json(Value::Null));
            }
            let value = serde_json::from_str(&text)
                .map_err(|e| ApiError::decode(format!("Invalid JSON body: {}", e)))?;
            return Ok(Payload::Json(value));
        }
        return Ok(Payload::Text(text));
    }

    // Error bodies: JSON first, plain text otherwise.
    let details: Option<Value> = serde_json::from_str(&text).ok();
    let message = details
        .as_ref()
        .and_then(extract_error_message)
        .or_else(|| {
            let trimmed = text.trim();
            if trimmed.is_empty() || details.is_some() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

    Err(ApiError::from_status(
        status.as_u16(),
        message,
        details,
        retry_after,
    ))
}
