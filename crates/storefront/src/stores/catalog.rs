//! Per-listing plant cache.

use std::collections::HashMap;

use green_cart_core::{Plant, PlantId};

/// Plants of the most recently rendered listing, keyed by ID.
///
/// Replaced wholesale on every listing render and never persisted. Lets the
/// widget open details and add to cart without refetching what is already
/// on screen.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    plants: HashMap<PlantId, Plant>,
}

impl CatalogStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole store with `plants`. Later duplicates win.
    pub fn replace(&mut self, plants: &[Plant]) {
        self.plants = plants
            .iter()
            .map(|plant| (plant.id.clone(), plant.clone()))
            .collect();
    }

    /// Look up a plant by ID.
    #[must_use]
    pub fn get(&self, id: &PlantId) -> Option<&Plant> {
        self.plants.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use green_cart_core::Price;

    use super::*;

    fn plant(id: &str, name: &str) -> Plant {
        Plant {
            id: PlantId::new(id),
            name: name.to_string(),
            description: String::new(),
            image: String::new(),
            price: Price::from_cents(1000),
            category: "General".to_string(),
        }
    }

    #[test]
    fn test_replace_is_not_a_merge() {
        let mut store = CatalogStore::new();
        store.replace(&[plant("1", "Mango"), plant("2", "Neem")]);
        assert_eq!(store.len(), 2);

        store.replace(&[plant("3", "Guava")]);
        assert_eq!(store.len(), 1);
        assert!(store.get(&PlantId::new("1")).is_none());
        assert_eq!(store.get(&PlantId::new("3")).unwrap().name, "Guava");
    }

    #[test]
    fn test_replace_with_empty_listing() {
        let mut store = CatalogStore::new();
        store.replace(&[plant("1", "Mango")]);
        store.replace(&[]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_ids_last_wins() {
        let mut store = CatalogStore::new();
        store.replace(&[plant("1", "First"), plant("1", "Second")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&PlantId::new("1")).unwrap().name, "Second");
    }
}
