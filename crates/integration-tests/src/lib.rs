//! Integration tests for Green Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p green-cart-integration-tests
//! ```
//!
//! Every test runs the widget against a `wiremock` catalog API and a
//! file-backed cart store in a temporary directory. No network access or
//! external services are needed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;

use green_cart_storefront::api::CatalogClient;
use green_cart_storefront::config::CART_STORAGE_KEY;
use green_cart_storefront::storage::{CartStorage, FileStore};
use green_cart_storefront::stores::{CartStore, CatalogStore};
use green_cart_storefront::widget::Widget;
use serde_json::Value;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock catalog API plus a scratch directory for the cart store.
pub struct TestContext {
    pub server: MockServer,
    pub storage_dir: TempDir,
}

impl TestContext {
    /// Start a mock API and create an empty storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub async fn new() -> std::io::Result<Self> {
        Ok(Self {
            server: MockServer::start().await,
            storage_dir: tempfile::tempdir()?,
        })
    }

    /// Answer `GET {route}` with a JSON body.
    pub async fn mount_json(&self, route: &str, body: Value) {
        self.mount(route, ResponseTemplate::new(200).set_body_json(body))
            .await;
    }

    /// Answer `GET {route}` with an arbitrary response.
    pub async fn mount(&self, route: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Build a widget whose cart is persisted in this context's directory.
    ///
    /// Each call loads the cart afresh, so a second widget sees what the
    /// first one saved.
    #[must_use]
    pub fn widget(&self) -> Widget {
        widget_with_storage(&self.server.uri(), self.storage_dir.path())
    }
}

/// Build a widget against `api_base` with a file store rooted at `dir`.
#[must_use]
pub fn widget_with_storage(api_base: &str, dir: &Path) -> Widget {
    let storage = CartStorage::new(FileStore::new(dir), CART_STORAGE_KEY);
    Widget::new(
        CatalogClient::with_base(api_base),
        CatalogStore::new(),
        CartStore::load(storage),
    )
}
