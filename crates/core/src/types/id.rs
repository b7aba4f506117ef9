//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.
//!
//! Upstream catalog APIs hand out identifiers as strings or numbers depending
//! on the endpoint, so every ID is stored in its string form.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use green_cart_core::define_id;
/// define_id!(PlantId);
/// define_id!(CategoryId);
///
/// let plant_id = PlantId::new("7");
/// let category_id = CategoryId::new("7");
///
/// // These are different types, so this won't compile:
/// // let _: PlantId = category_id;
/// assert_eq!(plant_id.as_str(), category_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(PlantId);
define_id!(CategoryId);

const GENERATED_ID_LEN: usize = 7;

/// Generate a short random identifier (7 base-36 characters).
///
/// Used when an upstream record carries no identifier at all.
#[must_use]
pub fn generate_id() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    (0..GENERATED_ID_LEN)
        .filter_map(|_| char::from_digit(rng.random_range(0..36), 36))
        .collect()
}
