//! Cart line items.

use serde::{Deserialize, Serialize};

use super::catalog::Plant;
use super::id::PlantId;
use super::price::Price;

/// One row in the cart, uniquely keyed by plant ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: PlantId,
    pub name: String,
    /// Unit price captured when the plant was first added.
    pub price: Price,
    /// Quantity, never below 1.
    #[serde(default = "default_qty")]
    pub qty: u32,
}

const fn default_qty() -> u32 {
    1
}

impl CartLineItem {
    /// Start a new line item for a single unit of `plant`.
    #[must_use]
    pub fn from_plant(plant: &Plant) -> Self {
        Self {
            id: plant.id.clone(),
            name: plant.name.clone(),
            price: plant.price,
            qty: 1,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.qty)
    }

    /// Apply a signed quantity change, never going below 1.
    pub fn adjust_qty(&mut self, delta: i64) {
        let next = i64::from(self.qty).saturating_add(delta).max(1);
        self.qty = u32::try_from(next).unwrap_or(u32::MAX);
    }
}
