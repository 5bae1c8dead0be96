//! HTTP adapter for the completion service.
//!
//! The service takes a [`CompletionRequest`] as a JSON body and answers with
//! a JSON object following the requested schema.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, warn};

use super::{CompletionError, CompletionRequest};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// Completions with internet context are slow; 30s still fails fast enough
/// for the fallback to be useful.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Prompt + schema in, schema-shaped JSON out.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Value, CompletionError>;
}

/// Stand-in used when no endpoint is configured; every call fails, so
/// callers fall back to placeholder data.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredService;

#[async_trait]
impl CompletionService for UnconfiguredService {
    async fn complete(&self, _request: CompletionRequest) -> Result<Value, CompletionError> {
        Err(CompletionError::NotConfigured(
            "set SUMMITCAST_AI_URL or run `summitcast set-endpoint URL`".to_string(),
        ))
    }
}

/// Completion client over HTTP.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
    initial_backoff: Duration,
}

impl HttpCompletionClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token: None,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, CompletionError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| CompletionError::NotConfigured(format!("Invalid API key: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, CompletionError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(CompletionError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl CompletionService for HttpCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Value, CompletionError> {
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            let response = self
                .client
                .post(&self.endpoint)
                .headers(self.auth_headers()?)
                .json(&request)
                .send()
                .await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    let text = response.text().await?;
                    debug!(endpoint = %self.endpoint, bytes = text.len(), "Completion received");
                    return serde_json::from_str(&text)
                        .map_err(|e| CompletionError::InvalidResponse(format!("Not JSON: {}", e)));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(CompletionError::RateLimited);
                    }
                    warn!(
                        endpoint = %self.endpoint,
                        retry = retries,
                        backoff_ms = backoff.as_millis() as u64,
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }
    }
}
