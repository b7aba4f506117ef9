//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are always in the storefront's single display currency. They are
//! serialized as plain JSON numbers so persisted carts stay readable by any
//! client of the same storage key.

use std::iter::Sum;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Symbol rendered in front of every formatted amount.
pub const CURRENCY_SYMBOL: &str = "$";

/// Lower bound (inclusive) of the placeholder price range, in cents.
const PLACEHOLDER_MIN_CENTS: i64 = 500;
/// Upper bound (exclusive) of the placeholder price range, in cents.
const PLACEHOLDER_MAX_CENTS: i64 = 5000;

/// A price in the display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero, used as the total of an empty cart.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create a price from a float, keeping only finite, strictly positive values.
    #[must_use]
    pub fn positive_from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        Decimal::try_from(value)
            .ok()
            .filter(|amount| amount.is_sign_positive() && !amount.is_zero())
            .map(Self)
    }

    /// A pseudo-random price in `[5.00, 50.00)`, whole cents.
    ///
    /// Stands in for upstream records whose price is missing or unusable.
    #[must_use]
    pub fn placeholder() -> Self {
        use rand::Rng;

        let cents = rand::rng().random_range(PLACEHOLDER_MIN_CENTS..PLACEHOLDER_MAX_CENTS);
        Self::from_cents(cents)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `qty` units, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn times(self, qty: u32) -> Self {
        Self(self.0.checked_mul(Decimal::from(qty)).unwrap_or(Decimal::MAX))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{CURRENCY_SYMBOL}{rounded:.2}")
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Saturates at [`Decimal::MAX`] instead of overflowing.
impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.fold(Decimal::ZERO, |total, price| {
            total.checked_add(price.0).unwrap_or(Decimal::MAX)
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_cents(1999).display(), "$19.99");
        assert_eq!(Price::from_cents(500).display(), "$5.00");
        assert_eq!(Price::ZERO.display(), "$0.00");
    }

    #[test]
    fn test_display_rounds_long_fractions() {
        let price = Price::positive_from_f64(3.999).unwrap();
        assert_eq!(price.display(), "$4.00");
        assert_eq!(Price::positive_from_f64(12.5).unwrap().display(), "$12.50");
    }

    #[test]
    fn test_positive_from_f64_rejects_invalid() {
        assert!(Price::positive_from_f64(0.0).is_none());
        assert!(Price::positive_from_f64(-3.5).is_none());
        assert!(Price::positive_from_f64(f64::NAN).is_none());
        assert!(Price::positive_from_f64(f64::INFINITY).is_none());
        assert!(Price::positive_from_f64(12.5).is_some());
    }

    #[test]
    fn test_placeholder_range() {
        let min = Price::from_cents(PLACEHOLDER_MIN_CENTS);
        let max = Price::from_cents(PLACEHOLDER_MAX_CENTS);
        for _ in 0..500 {
            let price = Price::placeholder();
            assert!(price >= min && price < max, "{price} out of range");
        }
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_cents(1000).times(2), Price::from_cents(500).times(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(2500));
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let huge = Price::positive_from_f64(5e28).unwrap();
        assert_eq!(huge.times(2).amount(), Decimal::MAX);
        let total: Price = [huge, huge, Price::from_cents(100)].into_iter().sum();
        assert_eq!(total.amount(), Decimal::MAX);
        assert!(total.display().starts_with('$'));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Price::from_cents(1250)).unwrap();
        assert_eq!(json, "12.5");
        let parsed: Price = serde_json::from_str("12.5").unwrap();
        assert_eq!(parsed, Price::from_cents(1250));
    }
}
