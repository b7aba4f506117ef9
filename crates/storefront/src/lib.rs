//! Green Cart storefront widget library.
//!
//! A catalog-and-cart widget: fetches plants and categories from a remote
//! catalog API, renders a browsable grid, and keeps a shopping cart
//! persisted in a local key-value store.
//!
//! # Architecture
//!
//! - [`api`] - HTTP client for the catalog API
//! - [`stores`] - per-listing catalog cache and the persisted cart
//! - [`storage`] - key-value stores backing the cart
//! - [`views`] - askama templates, one per page region
//! - [`page`] - region contents and visibility flags
//! - [`widget`] - interaction controller tying it together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod modal;
pub mod page;
pub mod storage;
pub mod stores;
pub mod views;
pub mod widget;

pub use widget::{AddToCart, ListingOutcome, UiEvent, Widget};
