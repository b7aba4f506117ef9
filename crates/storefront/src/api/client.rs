//! HTTP client for the catalog API.

use std::sync::Arc;

use green_cart_core::{CategoryId, PlantId};
use serde_json::Value;
use tracing::{debug, instrument};

use super::ApiError;
use crate::config::WidgetConfig;

/// Client for the catalog API.
///
/// Cheaply cloneable; clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base: String,
}

impl CatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        Self::with_base(&config.api_base)
    }

    /// Create a client for an explicit base URL.
    #[must_use]
    pub fn with_base(base: &str) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base: base.trim_end_matches('/').to_string(),
            }),
        }
    }

    /// The base URL requests are issued against.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.inner.base
    }

    /// GET a URL and parse its body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the transport fails, `ApiError::Status`
    /// for non-2xx responses, and `ApiError::Parse` if the body is not JSON.
    /// Numbers outside the `f64` range (such as `1e400`) are rejected by
    /// `serde_json`, so a body containing one fails as a whole.
    #[instrument(skip(self))]
    pub async fn fetch_json(&self, url: &str) -> Result<Value, ApiError> {
        let response = self.inner.client.get(url).send().await.inspect_err(|e| {
            tracing::error!(url, error = %e, "Catalog request failed");
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(url, status = %status, "Catalog API returned non-success status");
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.inspect_err(|e| {
            tracing::error!(url, error = %e, "Failed to read catalog response body");
        })?;

        let value: Value = serde_json::from_str(&body).inspect_err(|e| {
            tracing::error!(
                url,
                error = %e,
                body = %body.chars().take(200).collect::<String>(),
                "Catalog API returned invalid JSON"
            );
        })?;

        debug!(url, bytes = body.len(), "Fetched catalog response");
        Ok(value)
    }

    /// Fetch the category listing.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::fetch_json`].
    pub async fn categories(&self) -> Result<Value, ApiError> {
        self.fetch_json(&self.url(&["categories"])).await
    }

    /// Fetch the plant listing, optionally scoped to one category.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::fetch_json`].
    pub async fn plants(&self, category: Option<&CategoryId>) -> Result<Value, ApiError> {
        let url = match category {
            Some(id) => self.url(&["category", id.as_str()]),
            None => self.url(&["plants"]),
        };
        self.fetch_json(&url).await
    }

    /// Fetch a single plant's detail.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::fetch_json`].
    pub async fn plant(&self, id: &PlantId) -> Result<Value, ApiError> {
        self.fetch_json(&self.url(&["plant", id.as_str()])).await
    }

    /// Build an endpoint URL from percent-encoded path segments.
    fn url(&self, segments: &[&str]) -> String {
        segments.iter().fold(self.inner.base.clone(), |mut url, segment| {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
            url
        })
    }
}
