//! Response normalization.
//!
//! The catalog API is loose about envelopes and field names. Everything in
//! this module is best-effort and infallible: unknown shapes produce empty
//! sequences, missing fields produce defaults.
//!
//! # Envelopes
//!
//! Listing endpoints may return a bare array, an object wrapping the array
//! under one of several keys, or an object whose `data` field wraps it.
//! [`extract_array`] runs [`ARRAY_STRATEGIES`] in order and returns the first
//! match.
//!
//! # Records
//!
//! [`normalize_category`] and [`normalize_plant`] walk a fixed fallback chain
//! per field. A field counts as present when it exists and is not `null`.

use serde_json::Value;

use crate::types::{Category, CategoryId, Plant, PlantId, Price, generate_id};

/// Image shown for plants that come without one.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1501004318641-b39e6451bec6?auto=format&fit=crop&w=600&q=60";

const DEFAULT_CATEGORY_TITLE: &str = "Category";
const DEFAULT_PLANT_NAME: &str = "Unknown Plant";
const DEFAULT_PLANT_CATEGORY: &str = "General";

// =============================================================================
// Envelope extraction
// =============================================================================

/// One way of locating a listing array inside a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayStrategy {
    /// The response itself is the array.
    Bare,
    /// A top-level field holds the array.
    Field(&'static str),
    /// A field nested one level inside another holds the array.
    Nested(&'static str, &'static str),
}

impl ArrayStrategy {
    /// Try this strategy against a response.
    #[must_use]
    pub fn apply(self, response: &Value) -> Option<&[Value]> {
        let candidate = match self {
            Self::Bare => Some(response),
            Self::Field(key) => response.get(key),
            Self::Nested(outer, inner) => response.get(outer).and_then(|v| v.get(inner)),
        };
        candidate.and_then(Value::as_array).map(Vec::as_slice)
    }
}

/// Extraction strategies for listing responses, tried first to last.
///
/// Wrapper keys are probed in the order `data`, `plants`, `categories`,
/// `results`, `items`, each at the top level and then inside `data`.
pub const ARRAY_STRATEGIES: [ArrayStrategy; 11] = [
    ArrayStrategy::Bare,
    ArrayStrategy::Field("data"),
    ArrayStrategy::Nested("data", "data"),
    ArrayStrategy::Field("plants"),
    ArrayStrategy::Nested("data", "plants"),
    ArrayStrategy::Field("categories"),
    ArrayStrategy::Nested("data", "categories"),
    ArrayStrategy::Field("results"),
    ArrayStrategy::Nested("data", "results"),
    ArrayStrategy::Field("items"),
    ArrayStrategy::Nested("data", "items"),
];

/// Locate the listing array in a response.
///
/// Returns an empty slice when no strategy matches.
#[must_use]
pub fn extract_array(response: &Value) -> &[Value] {
    ARRAY_STRATEGIES
        .iter()
        .find_map(|strategy| strategy.apply(response))
        .unwrap_or(&[])
}

/// Fields that may wrap a single-record detail response, in priority order.
const RECORD_KEYS: [&str; 2] = ["data", "plant"];

/// Locate the single record in a detail response.
#[must_use]
pub fn extract_record(response: &Value) -> Option<&Value> {
    RECORD_KEYS
        .iter()
        .filter_map(|key| response.get(key))
        .find(|value| value.is_object())
}

// =============================================================================
// Record normalization
// =============================================================================

/// First present (non-null) value among `keys`.
fn first_present<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(key))
        .find(|value| !value.is_null())
}

/// First element of an array field, if present.
fn first_element<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    raw.get(key)
        .and_then(|value| value.get(0_usize))
        .filter(|value| !value.is_null())
}

/// Stringify a present JSON value.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a raw price like a leading-float parse would.
///
/// Numbers are taken as-is; strings contribute their longest numeric prefix
/// after leading whitespace. Anything else is not a number.
fn parse_leading_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim_start();
            // Longest prefix that parses; prefixes are ASCII so byte slicing is safe.
            let numeric_len = trimmed
                .chars()
                .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
                .count();
            (1..=numeric_len)
                .rev()
                .find_map(|len| trimmed.get(..len).and_then(|p| p.parse::<f64>().ok()))
        }
        _ => None,
    }
}

/// Map a raw category record onto [`Category`].
#[must_use]
pub fn normalize_category(raw: &Value) -> Category {
    let id = first_present(raw, &["id", "category_id", "_id", "cid"])
        .map_or_else(generate_id, text);
    let title = first_present(raw, &["category", "name", "category_name", "title"])
        .map_or_else(|| DEFAULT_CATEGORY_TITLE.to_string(), text);

    Category {
        id: CategoryId::new(id),
        title,
    }
}

/// Map a raw plant record onto [`Plant`].
///
/// Prices that are missing, non-numeric, zero, or negative are replaced with
/// [`Price::placeholder`].
#[must_use]
pub fn normalize_plant(raw: &Value) -> Plant {
    let id = first_present(raw, &["id", "plant_id", "_id", "slug"]).map_or_else(generate_id, text);
    let name = first_present(raw, &["name", "plant_name", "title", "plant"])
        .map_or_else(|| DEFAULT_PLANT_NAME.to_string(), text);
    let description = first_present(raw, &["description", "short_description", "details", "about"])
        .map(text)
        .unwrap_or_default();
    let image = first_present(raw, &["image", "thumbnail"])
        .or_else(|| first_element(raw, "images"))
        .map_or_else(|| PLACEHOLDER_IMAGE.to_string(), text);
    let price = raw
        .get("price")
        .and_then(parse_leading_float)
        .and_then(Price::positive_from_f64)
        .unwrap_or_else(Price::placeholder);
    let category = first_present(raw, &["category", "category_name"])
        .or_else(|| first_element(raw, "categories"))
        .map_or_else(|| DEFAULT_PLANT_CATEGORY.to_string(), text);

    Plant {
        id: PlantId::new(id),
        name,
        description,
        image,
        price,
        category,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn in_placeholder_range(price: Price) -> bool {
        price >= Price::from_cents(500) && price < Price::from_cents(5000)
    }

    // =========================================================================
    // extract_array
    // =========================================================================

    #[test]
    fn test_extract_array_bare() {
        let response = json!([{"id": 1}, {"id": 2}]);
        assert_eq!(extract_array(&response), response.as_array().unwrap().as_slice());
    }

    #[test]
    fn test_extract_array_data_wrapper_keeps_order() {
        let response = json!({"status": true, "data": [{"id": "b"}, {"id": "a"}]});
        let items = extract_array(&response);
        assert_eq!(items, &[json!({"id": "b"}), json!({"id": "a"})]);
    }

    #[test]
    fn test_extract_array_plants_wrapper() {
        let response = json!({"status": true, "plants": [{"id": 3}]});
        assert_eq!(extract_array(&response), &[json!({"id": 3})]);
    }

    #[test]
    fn test_extract_array_nested_in_data() {
        let response = json!({"data": {"categories": [{"id": 1}, {"id": 2}]}});
        assert_eq!(extract_array(&response).len(), 2);
    }

    #[test]
    fn test_extract_array_priority_order() {
        // Top-level `plants` is probed before `data.categories`.
        let response = json!({
            "data": {"categories": [{"id": "nested"}]},
            "plants": [{"id": "top"}]
        });
        assert_eq!(extract_array(&response), &[json!({"id": "top"})]);
    }

    #[test]
    fn test_extract_array_total_mismatch_is_empty() {
        assert!(extract_array(&Value::Null).is_empty());
        assert!(extract_array(&json!("nope")).is_empty());
        assert!(extract_array(&json!({"data": {"plant": {}}})).is_empty());
        assert!(extract_array(&json!({"items": "not-an-array"})).is_empty());
    }

    // =========================================================================
    // extract_record
    // =========================================================================

    #[test]
    fn test_extract_record() {
        let response = json!({"status": true, "plants": {"id": 1, "name": "Mango"}});
        assert!(extract_record(&response).is_none());

        let response = json!({"data": null, "plant": {"id": 1}});
        assert_eq!(extract_record(&response), Some(&json!({"id": 1})));

        let response = json!({"data": {"id": 2}, "plant": {"id": 1}});
        assert_eq!(extract_record(&response), Some(&json!({"id": 2})));
    }

    // =========================================================================
    // normalize_category
    // =========================================================================

    #[test]
    fn test_normalize_category_primary_fields() {
        let category = normalize_category(&json!({"id": 1, "category_name": "Fruit Tree"}));
        assert_eq!(category.id.as_str(), "1");
        assert_eq!(category.title, "Fruit Tree");
    }

    #[test]
    fn test_normalize_category_fallbacks() {
        let category = normalize_category(&json!({"_id": "abc", "title": "Shade"}));
        assert_eq!(category.id.as_str(), "abc");
        assert_eq!(category.title, "Shade");

        let category = normalize_category(&json!({"category": "Herbs", "name": "ignored"}));
        assert_eq!(category.title, "Herbs");
    }

    #[test]
    fn test_normalize_category_defaults() {
        let category = normalize_category(&json!({}));
        assert_eq!(category.title, "Category");
        assert_eq!(category.id.as_str().len(), 7);
    }

    #[test]
    fn test_normalize_category_null_is_absent() {
        let category = normalize_category(&json!({"id": null, "cid": 9}));
        assert_eq!(category.id.as_str(), "9");
    }

    // =========================================================================
    // normalize_plant
    // =========================================================================

    #[test]
    fn test_normalize_plant_full_record() {
        let plant = normalize_plant(&json!({
            "id": 4,
            "image": "https://example.com/mango.png",
            "name": "Mango Tree",
            "description": "Sweet.",
            "category": "Fruit Tree",
            "price": 500
        }));
        assert_eq!(plant.id.as_str(), "4");
        assert_eq!(plant.name, "Mango Tree");
        assert_eq!(plant.description, "Sweet.");
        assert_eq!(plant.image, "https://example.com/mango.png");
        assert_eq!(plant.price, Price::from_cents(50_000));
        assert_eq!(plant.category, "Fruit Tree");
    }

    #[test]
    fn test_normalize_plant_fallback_fields() {
        let plant = normalize_plant(&json!({
            "slug": "neem",
            "plant_name": "Neem",
            "about": "Hardy.",
            "images": ["https://example.com/neem.png"],
            "categories": ["Medicinal"],
            "price": "12.5 USD"
        }));
        assert_eq!(plant.id.as_str(), "neem");
        assert_eq!(plant.name, "Neem");
        assert_eq!(plant.description, "Hardy.");
        assert_eq!(plant.image, "https://example.com/neem.png");
        assert_eq!(plant.category, "Medicinal");
        assert_eq!(plant.price, Price::from_cents(1250));
    }

    #[test]
    fn test_normalize_plant_defaults() {
        let plant = normalize_plant(&json!({}));
        assert_eq!(plant.name, "Unknown Plant");
        assert_eq!(plant.description, "");
        assert_eq!(plant.image, PLACEHOLDER_IMAGE);
        assert_eq!(plant.category, "General");
        assert!(in_placeholder_range(plant.price));
    }

    #[test]
    fn test_normalize_plant_non_object() {
        let plant = normalize_plant(&Value::Null);
        assert_eq!(plant.name, "Unknown Plant");
        assert!(in_placeholder_range(plant.price));
    }

    #[test]
    fn test_normalize_plant_bad_prices_use_placeholder() {
        for price in [json!(0), json!(-4), json!("free"), json!(null), json!(true), json!("")] {
            for _ in 0..50 {
                let plant = normalize_plant(&json!({"id": 1, "price": price}));
                assert!(in_placeholder_range(plant.price), "price {price} -> {}", plant.price);
            }
        }
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float(&json!("  3.25abc")), Some(3.25));
        assert_eq!(parse_leading_float(&json!("7")), Some(7.0));
        assert_eq!(parse_leading_float(&json!("1e2x")), Some(100.0));
        assert_eq!(parse_leading_float(&json!("abc")), None);
        assert_eq!(parse_leading_float(&json!(2.5)), Some(2.5));
        assert_eq!(parse_leading_float(&json!([1])), None);
    }
}
