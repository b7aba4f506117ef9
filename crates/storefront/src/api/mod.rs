//! Catalog API client.
//!
//! # Architecture
//!
//! - Plain HTTP GET + JSON via `reqwest`; one attempt per call
//! - No retries, no timeouts, no response caching
//! - Envelope shapes are not trusted; callers run responses through
//!   [`green_cart_core::normalize`]
//!
//! # Endpoints
//!
//! - `GET {base}/categories` - category listing
//! - `GET {base}/plants` - full plant listing
//! - `GET {base}/category/{id}` - plant listing for one category
//! - `GET {base}/plant/{id}` - single plant detail
//!
//! # Example
//!
//! ```rust,ignore
//! use green_cart_storefront::api::CatalogClient;
//!
//! let client = CatalogClient::new(&config);
//! let response = client.plants(None).await?;
//! let plants = green_cart_core::normalize::extract_array(&response);
//! ```

mod client;

pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP transport failed (DNS, connection, body read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Network error: {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether this error belongs to the network kind (transport or status).
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. })
    }

    /// Whether this error belongs to the parse kind.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}
