//! Normalized catalog records.
//!
//! Upstream payloads are loosely shaped; these are the two fixed shapes the
//! rest of the system works with. See [`crate::normalize`] for how raw
//! records are mapped onto them.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, PlantId};
use super::price::Price;

/// A browsable plant category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier, used in listing URLs.
    pub id: CategoryId,
    /// Display title.
    pub title: String,
}

/// A plant offered in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
    pub description: String,
    /// Image URL.
    pub image: String,
    /// Always strictly positive.
    pub price: Price,
    /// Category display name.
    pub category: String,
}
