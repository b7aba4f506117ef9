//! Core types for Green Cart.
//!
//! This module provides type-safe wrappers for catalog and cart concepts.

pub mod cart;
pub mod catalog;
pub mod id;
pub mod price;

pub use cart::CartLineItem;
pub use catalog::{Category, Plant};
pub use id::*;
pub use price::{CURRENCY_SYMBOL, Price};
