//! Cart store with write-through persistence.

use green_cart_core::{CartLineItem, Plant, PlantId, Price};
use tracing::{debug, warn};

use crate::storage::CartStorage;

/// The cart: an ordered list of line items, one per plant ID.
///
/// This is the only mutable copy of the cart. Every mutation is written
/// through to [`CartStorage`]; a failed write is logged and the in-memory
/// change stands.
#[derive(Debug)]
pub struct CartStore {
    items: Vec<CartLineItem>,
    storage: CartStorage,
}

impl CartStore {
    /// Load the cart from storage.
    ///
    /// An unreadable or malformed stored value yields an empty cart.
    #[must_use]
    pub fn load(storage: CartStorage) -> Self {
        let items = match storage.load() {
            Ok(items) => sanitize(items),
            Err(e) => {
                warn!(key = storage.key(), error = %e, "Failed to load cart from storage");
                Vec::new()
            }
        };
        debug!(lines = items.len(), "Cart loaded");
        Self { items, storage }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up a line item.
    #[must_use]
    pub fn get(&self, id: &PlantId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `plant`, merging into an existing line if present.
    pub fn add(&mut self, plant: &Plant) {
        match self.items.iter_mut().find(|item| item.id == plant.id) {
            Some(existing) => existing.adjust_qty(1),
            None => self.items.push(CartLineItem::from_plant(plant)),
        }
        self.persist();
    }

    /// Remove the line for `id`. Returns `false` (and changes nothing) if absent.
    pub fn remove(&mut self, id: &PlantId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        if self.items.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Change the quantity of `id` by `delta`, never below 1.
    ///
    /// Returns `false` (and changes nothing) if `id` is not in the cart.
    pub fn change_qty(&mut self, id: &PlantId, delta: i64) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return false;
        };
        item.adjust_qty(delta);
        self.persist();
        true
    }

    /// Sum of `price × qty` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.qty))
    }

    fn persist(&mut self) {
        if let Err(e) = self.storage.save(&self.items) {
            warn!(key = self.storage.key(), error = %e, "Failed to persist cart");
        }
    }
}

/// Enforce line-item invariants on loaded data: positive price, qty >= 1,
/// one line per ID.
fn sanitize(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut merged: Vec<CartLineItem> = Vec::with_capacity(items.len());
    for mut item in items {
        if item.price <= Price::ZERO {
            warn!(plant_id = %item.id, price = %item.price, "Dropping stored cart line with invalid price");
            continue;
        }
        item.qty = item.qty.max(1);
        match merged.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.qty = existing.qty.saturating_add(item.qty),
            None => merged.push(item),
        }
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::storage::{KeyValueStore, MemoryStore, StorageError};

    use super::*;

    fn plant(id: &str, cents: i64) -> Plant {
        Plant {
            id: PlantId::new(id),
            name: format!("Plant {id}"),
            description: String::new(),
            image: String::new(),
            price: Price::from_cents(cents),
            category: "General".to_string(),
        }
    }

    fn empty_cart() -> CartStore {
        CartStore::load(CartStorage::new(MemoryStore::new(), "cart"))
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    /// Store whose reads always fail.
    struct UnreadableStore;

    impl KeyValueStore for UnreadableStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_add_same_plant_twice_merges() {
        let mut cart = empty_cart();
        let mango = plant("1", 1000);
        cart.add(&mango);
        cart.add(&mango);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].qty, 2);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = empty_cart();
        cart.add(&plant("b", 100));
        cart.add(&plant("a", 100));
        cart.add(&plant("b", 100));
        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_change_qty_floors_at_one() {
        let mut cart = empty_cart();
        let mango = plant("1", 1000);
        for _ in 0..3 {
            cart.add(&mango);
        }
        assert!(cart.change_qty(&mango.id, -100));
        assert_eq!(cart.get(&mango.id).unwrap().qty, 1);
    }

    #[test]
    fn test_change_qty_unknown_id_is_noop() {
        let mut cart = empty_cart();
        cart.add(&plant("1", 1000));
        assert!(!cart.change_qty(&PlantId::new("missing"), 1));
        assert_eq!(cart.total(), Price::from_cents(1000));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = empty_cart();
        cart.add(&plant("1", 1000));
        let before = cart.items().to_vec();
        assert!(!cart.remove(&PlantId::new("nope")));
        assert_eq!(cart.items(), before.as_slice());
        assert_eq!(cart.total(), Price::from_cents(1000));
    }

    #[test]
    fn test_remove_existing() {
        let mut cart = empty_cart();
        cart.add(&plant("1", 1000));
        cart.add(&plant("2", 500));
        assert!(cart.remove(&PlantId::new("1")));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].id.as_str(), "2");
    }

    #[test]
    fn test_total() {
        let mut cart = empty_cart();
        let ten = plant("1", 1000);
        cart.add(&ten);
        cart.add(&ten);
        cart.add(&plant("2", 500));
        assert_eq!(cart.total(), Price::from_cents(2500));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert_eq!(empty_cart().total(), Price::ZERO);
    }

    #[test]
    fn test_mutations_write_through() {
        let mut store = MemoryStore::new();
        store.set("cart", "[]").unwrap();
        let mut cart = CartStore::load(CartStorage::new(store, "cart"));
        cart.add(&plant("1", 1000));
        cart.add(&plant("1", 1000));
        cart.change_qty(&PlantId::new("1"), 3);

        // Reload through the same storage the store wrote to.
        let items = cart.storage.load().unwrap();
        assert_eq!(items, cart.items());
        assert_eq!(items[0].qty, 5);
    }

    #[test]
    fn test_save_failure_keeps_in_memory_change() {
        let mut cart = CartStore::load(CartStorage::new(ReadOnlyStore, "cart"));
        cart.add(&plant("1", 1000));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_unreadable_storage_is_empty_cart() {
        let cart = CartStore::load(CartStorage::new(UnreadableStore, "cart"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_malformed_storage_is_empty_cart() {
        let mut store = MemoryStore::new();
        store.set("cart", "definitely not json").unwrap();
        let cart = CartStore::load(CartStorage::new(store, "cart"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_huge_price_total_does_not_panic() {
        let raw = serde_json::json!({"id": 1, "name": "Giant Sequoia", "price": 5e28});
        let sequoia = green_cart_core::normalize::normalize_plant(&raw);

        let mut cart = empty_cart();
        cart.add(&sequoia);
        cart.add(&sequoia);
        assert_eq!(cart.get(&sequoia.id).unwrap().qty, 2);
        assert_eq!(cart.total(), sequoia.price.times(2));

        // The persisted cart reloads and totals without panicking.
        let reloaded = CartStore::load(cart.storage);
        assert_eq!(reloaded.items().len(), 1);
        assert!(reloaded.total() > Price::ZERO);
    }

    #[test]
    fn test_load_drops_lines_with_invalid_price() {
        let mut store = MemoryStore::new();
        store
            .set(
                "cart",
                r#"[{"id":"1","name":"A","price":-4,"qty":1},
                    {"id":"2","name":"B","price":0,"qty":3},
                    {"id":"3","name":"C","price":2.5,"qty":2}]"#,
            )
            .unwrap();
        let cart = CartStore::load(CartStorage::new(store, "cart"));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].id.as_str(), "3");
        assert_eq!(cart.total(), Price::from_cents(500));
    }

    #[test]
    fn test_load_sanitizes_stored_lines() {
        let mut store = MemoryStore::new();
        store
            .set(
                "cart",
                r#"[{"id":"1","name":"A","price":10,"qty":0},
                    {"id":"2","name":"B","price":5},
                    {"id":"1","name":"A","price":10,"qty":2}]"#,
            )
            .unwrap();
        let cart = CartStore::load(CartStorage::new(store, "cart"));
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.get(&PlantId::new("1")).unwrap().qty, 3);
        assert_eq!(cart.get(&PlantId::new("2")).unwrap().qty, 1);
    }
}
