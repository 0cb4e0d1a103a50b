use super::types::{Item, ItemId, Listing};
use crate::config::Config;
use crate::util::{validate_base_url, UrlValidationError};
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::redirect::Policy;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Errors from talking to the read API.
///
/// Every fetch is all-or-nothing: a batch or a tree resolution fails with the
/// first error encountered.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the 5MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// An id-list endpoint returned something other than a JSON array
    #[error("Expected a list of item ids")]
    NotAList,
    /// Body was not valid JSON or did not have the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),
    /// The item endpoint returned `null`
    #[error("Item {0} not found")]
    MissingItem(ItemId),
    /// Base URL is plain HTTP to a non-loopback host
    #[error("API base URL must use HTTPS")]
    InsecureBaseUrl,
    /// The HTTP client could not be constructed
    #[error("Client setup failed: {0}")]
    Client(String),
}

impl From<UrlValidationError> for ApiError {
    fn from(e: UrlValidationError) -> Self {
        match e {
            UrlValidationError::Insecure => ApiError::InsecureBaseUrl,
            other => ApiError::Client(other.to_string()),
        }
    }
}

/// Async client for the Hacker News read API.
///
/// Cheap to clone: the underlying `reqwest::Client` and base URL are shared.
#[derive(Debug, Clone)]
pub struct HnClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    max_in_flight: usize,
    timeout: Duration,
}

impl HnClient {
    /// Builds a client for `base_url`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InsecureBaseUrl`] for plain HTTP to a remote host
    /// - [`ApiError::Client`] for unparsable URLs or TLS setup failures
    pub fn new(base_url: &str, max_in_flight: usize, timeout: Duration) -> Result<Self, ApiError> {
        let validated = validate_base_url(base_url)?;
        let base_url: Arc<str> = Arc::from(validated.as_str().trim_end_matches('/'));

        let http = reqwest::Client::builder()
            .redirect(redirect_policy())
            .user_agent(concat!("hnreader/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            max_in_flight: max_in_flight.max(1),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            &config.api_base_url,
            config.max_concurrent_requests,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches an id list (`GET {base}/{listing}.json`).
    ///
    /// # Errors
    ///
    /// [`ApiError::NotAList`] when the body is valid JSON but not an array,
    /// [`ApiError::Malformed`] when an entry is not a non-negative integer.
    pub async fn fetch_ids(&self, listing: Listing) -> Result<Vec<ItemId>, ApiError> {
        let url = format!("{}/{}.json", self.base_url, listing.endpoint());
        let value = self.get_json(&url).await?;

        let serde_json::Value::Array(entries) = value else {
            return Err(ApiError::NotAList);
        };
        entries
            .iter()
            .map(|v| {
                v.as_u64()
                    .ok_or_else(|| ApiError::Malformed(format!("non-integer id in {}: {}", listing, v)))
            })
            .collect()
    }

    /// Fetches one item (`GET {base}/item/{id}.json`).
    ///
    /// The API answers unknown ids with a `200` and a `null` body, which is
    /// reported as [`ApiError::MissingItem`].
    pub async fn fetch_item(&self, id: ItemId) -> Result<Item, ApiError> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        let value = self.get_json(&url).await?;
        if value.is_null() {
            return Err(ApiError::MissingItem(id));
        }
        serde_json::from_value(value).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Fetches several items with bounded concurrency.
    ///
    /// Results keep the order of `ids`. The first failure aborts the batch and
    /// drops the requests still in flight.
    pub async fn fetch_items(&self, ids: &[ItemId]) -> Result<Vec<Item>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        stream::iter(ids.iter().copied())
            .map(|id| self.fetch_item(id))
            .buffered(self.max_in_flight)
            .try_collect()
            .await
    }

    /// Loads the first `count` items of a listing.
    pub async fn load_stories(&self, listing: Listing, count: usize) -> Result<Vec<Item>, ApiError> {
        let ids = self.fetch_ids(listing).await?;
        let slice = &ids[..ids.len().min(count)];
        tracing::debug!(listing = %listing, available = ids.len(), requested = slice.len(), "Loading items");
        self.fetch_items(slice).await
    }

    /// Loads the `count` newest comments, one level only (no replies).
    pub async fn load_newest_comments(&self, count: usize) -> Result<Vec<Item>, ApiError> {
        self.load_stories(Listing::NewComments, count).await
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, ApiError> {
        let secs = self.timeout.as_secs();
        let bytes = tokio::time::timeout(self.timeout, async {
            let response = self.http.get(url).send().await?;
            if !response.status().is_success() {
                return Err(ApiError::HttpStatus(response.status().as_u16()));
            }
            read_limited_bytes(response, MAX_RESPONSE_SIZE).await
        })
        .await
        .map_err(|_| ApiError::Timeout(secs))??;

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

/// Follows at most 3 redirects and refuses loops.
fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }
        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }
        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

async fn read_limited_bytes(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(ApiError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
