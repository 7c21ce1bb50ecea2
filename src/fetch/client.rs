//! HTTP client for the update server
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Mapping of reqwest failures onto [`FetchError`]

use crate::error::FetchError;
use crate::fetch::Transport;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("modsync/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                FetchError::network("", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request with retry logic
    ///
    /// 404 is returned immediately as [`FetchError::NotFound`]; connection
    /// failures, timeouts and other non-success statuses are retried.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(url, attempt, "retrying request");
            }

            let error = match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if status == reqwest::StatusCode::NOT_FOUND {
                        FetchError::not_found(url)
                    } else {
                        FetchError::network(url, format!("HTTP {}", status))
                    }
                }
                Err(e) if e.is_timeout() => FetchError::timeout(url),
                Err(e) if e.is_connect() => FetchError::connect(url, e.to_string()),
                Err(e) => FetchError::network(url, e.to_string()),
            };

            if !error.is_retryable() {
                return Err(error);
            }
            last_error = Some(error);
            if attempt < self.max_retries {
                // Wait before retrying with exponential backoff
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::network(url, "unknown error")))
    }

    /// Perform a GET request and return the body as text
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        response.text().await.map_err(|e| {
            FetchError::invalid_response(url, format!("failed to get text response: {}", e))
        })
    }

    /// Perform a GET request and return the raw body
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await.map_err(|e| {
            FetchError::invalid_response(url, format!("failed to read response body: {}", e))
        })?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "fetching text");
        self.get_text(url).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!(url, "fetching bytes");
        self.get_bytes(url).await
    }
}
