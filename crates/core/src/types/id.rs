//! Newtype IDs for type-safe record references.
//!
//! The backend identifies documents with opaque string IDs and users with the
//! identity provider's subject claim. Use the `define_id!` macro to keep the
//! two from being mixed up.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use forkful_core::define_id;
/// define_id!(OrderId);
/// define_id!(CourierId);
///
/// let order_id = OrderId::new("665f1c2a");
/// let courier_id = CourierId::new("665f1c2a");
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = courier_id;
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
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
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
    };
}

// Backend document IDs (`_id`)
define_id!(RestaurantId);
define_id!(MenuItemId);
define_id!(UserId);

// Identity provider subject claim (`sub`), e.g. `auth0|64f0...`
define_id!(SubjectId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_id_is_transparent_in_json() {
        let sub = SubjectId::new("auth0|abc123");
        let json = serde_json::to_string(&sub).expect("serialize");
        assert_eq!(json, "\"auth0|abc123\"");
    }

    #[test]
    fn test_display_matches_inner() {
        let id = RestaurantId::from("665f1c2a9b");
        assert_eq!(id.to_string(), "665f1c2a9b");
        assert_eq!(id.into_inner(), "665f1c2a9b");
    }
}
