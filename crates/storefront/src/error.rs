//! Unified error handling with Sentry integration.
//!
//! Provides a unified `WidgetError` type for the few operations that surface
//! errors to the caller. Region renders never fail outward; they swap in an
//! inline error message instead.

use green_cart_core::PlantId;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Widget-level error type.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Catalog API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Local storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Template rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Writing the page snapshot failed.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] std::io::Error),

    /// The detail endpoint returned no plant record.
    #[error("Plant not found: {0}")]
    PlantNotFound(PlantId),
}

impl WidgetError {
    /// Log the error and capture it to Sentry.
    ///
    /// A missing plant is an upstream data problem, not a fault; it is
    /// logged without a Sentry event.
    pub fn report(&self, context: &str) {
        if matches!(self, Self::PlantNotFound(_)) {
            tracing::warn!(error = %self, context, "Widget error");
            return;
        }
        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            context,
            sentry_event_id = %event_id,
            "Widget error"
        );
    }
}

/// Result type alias for `WidgetError`.
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added plant", Some(&[("plant_id", "12")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
