//! Green Cart - catalog-and-cart widget.
//!
//! This binary boots the widget against the configured catalog API, runs the
//! startup sequence (cart, categories, all plants) and writes the rendered
//! page to `GREEN_CART_SNAPSHOT_PATH`.
//!
//! # Architecture
//!
//! - Askama templates for every page region
//! - Catalog API over `reqwest`, normalized by `green-cart-core`
//! - Cart persisted to a file-backed key-value store
//! - Single-threaded Tokio runtime with a `LocalSet`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use green_cart_storefront::api::CatalogClient;
use green_cart_storefront::config::WidgetConfig;
use green_cart_storefront::error::WidgetError;
use green_cart_storefront::storage::{CartStorage, FileStore};
use green_cart_storefront::stores::{CartStore, CatalogStore};
use green_cart_storefront::widget::Widget;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &WidgetConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

// Tracing is not up yet when configuration fails.
#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    let config = match WidgetConfig::from_env().map_err(WidgetError::from) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "green_cart_storefront=info,green_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    let local = tokio::task::LocalSet::new();
    match local.block_on(&runtime, run(&config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report("snapshot");
            ExitCode::FAILURE
        }
    }
}

/// Boot the widget, run startup, and write the page snapshot.
#[allow(clippy::future_not_send)]
async fn run(config: &WidgetConfig) -> Result<(), WidgetError> {
    tracing::info!(
        api_base = %config.api_base,
        storage_dir = %config.storage_dir.display(),
        "Starting green-cart"
    );

    let storage = CartStorage::new(FileStore::new(config.storage_dir.clone()), config.cart_key.as_str());
    let widget = Widget::new(
        CatalogClient::new(config),
        CatalogStore::new(),
        CartStore::load(storage),
    );

    widget.init().await;
    widget.write_snapshot(&config.snapshot_path)
}
