//! In-memory stores owned by the widget.
//!
//! - [`CatalogStore`] - plants of the listing currently on screen, by ID
//! - [`CartStore`] - cart line items, written through to local storage

mod cart;
mod catalog;

pub use cart::CartStore;
pub use catalog::CatalogStore;
