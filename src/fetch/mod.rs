//! Farm document fetching.
//!
//! Fetches the raw farm JSON from the community API. Documents are returned
//! untyped; validation happens in [`crate::validate`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::ApiConfig;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid farm id: {0:?}")]
    InvalidFarmId(String),

    #[error("Farm not found: {0}")]
    NotFound(String),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Content too large: {size} bytes (max {max_size})")]
    ContentTooLarge { size: usize, max_size: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    /// Upstream HTTP status behind this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::NotFound(_) => Some(404),
            FetchError::RateLimited { .. } => Some(429),
            FetchError::HttpStatus { status, .. } => Some(*status),
            FetchError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Anything that can produce a raw farm document by id.
#[async_trait]
pub trait FarmSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// Fetch the raw document for a farm.
    async fn fetch_farm(&self, farm_id: &str) -> Result<Value, FetchError>;
}

/// Farm ids are numeric in practice; allow ASCII alphanumerics so ids can
/// never alter the request path.
pub fn check_farm_id(farm_id: &str) -> Result<(), FetchError> {
    if farm_id.is_empty() || !farm_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FetchError::InvalidFarmId(farm_id.to_string()));
    }
    Ok(())
}

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// URL farm ids are appended to; must end with `/`
    pub base_url: Url,

    /// Maximum content size to accept
    pub max_content_size: usize,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl FetcherConfig {
    pub fn from_api_config(api: &ApiConfig) -> Result<Self, FetchError> {
        let mut base = api.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            base_url,
            max_content_size: api.max_content_size,
            timeout: Duration::from_secs(api.timeout_seconds),
            user_agent: api.user_agent.clone(),
        })
    }
}

/// HTTP client for the community farm endpoint.
pub struct FarmClient {
    client: Client,
    config: FetcherConfig,
}

impl FarmClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("farm-timers/0.1.0")),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// URL of a farm's document.
    pub fn url_for(&self, farm_id: &str) -> Result<Url, FetchError> {
        check_farm_id(farm_id)?;
        self.config
            .base_url
            .join(farm_id)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl FarmSource for FarmClient {
    fn name(&self) -> &'static str {
        "community-api"
    }

    async fn fetch_farm(&self, farm_id: &str) -> Result<Value, FetchError> {
        let url = self.url_for(farm_id)?;
        info!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(FetchError::RateLimited {
                host: url.host_str().unwrap_or("unknown").to_string(),
                retry_after_secs: retry_after,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(farm_id.to_string()));
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let content = response.bytes().await?;

        if content.len() > self.config.max_content_size {
            return Err(FetchError::ContentTooLarge {
                size: content.len(),
                max_size: self.config.max_content_size,
            });
        }

        debug!("Received {} bytes for farm {}", content.len(), farm_id);
        Ok(serde_json::from_slice(&content)?)
    }
}

/// Serves fixed documents from memory; for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    farms: HashMap<String, Value>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_farm(mut self, farm_id: &str, document: Value) -> Self {
        self.farms.insert(farm_id.to_string(), document);
        self
    }
}

#[async_trait]
impl FarmSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_farm(&self, farm_id: &str) -> Result<Value, FetchError> {
        check_farm_id(farm_id)?;
        self.farms
            .get(farm_id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(farm_id.to_string()))
    }
}
