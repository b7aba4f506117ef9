//! Green Cart Core - Shared catalog and cart types.
//!
//! This crate provides the types used across all Green Cart components:
//! - `storefront` - The catalog-and-cart widget (API client, stores, views)
//! - `integration-tests` - End-to-end flows against a mock catalog API
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. This keeps it lightweight and easy to test.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, catalog records, and cart line items
//! - [`normalize`] - Mapping loosely-shaped API payloads onto the catalog records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod normalize;
pub mod types;

pub use types::*;
