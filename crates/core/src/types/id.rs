//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an entity ID.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IdError {
    /// The input is not a valid 24-character hex object id.
    #[error("invalid object id: {0}")]
    Invalid(String),
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around a BSON `ObjectId` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `parse_str()`, `as_object_id()`
/// - `From<ObjectId>` and `Into<Bson>` implementations
///
/// # Example
///
/// ```rust
/// # use orbit_market_core::define_id;
/// define_id!(UserId);
/// define_id!(ProductId);
///
/// let user_id = UserId::parse_str("507f1f77bcf86cd799439011").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = user_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::bson::oid::ObjectId);

        impl $name {
            /// Create a new ID from an `ObjectId` value.
            #[must_use]
            pub const fn new(id: ::bson::oid::ObjectId) -> Self {
                Self(id)
            }

            /// Parse an ID from its 24-character hex representation.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is not valid hex of the right length.
            pub fn parse_str(s: &str) -> ::core::result::Result<Self, $crate::types::id::IdError> {
                ::bson::oid::ObjectId::parse_str(s)
                    .map(Self)
                    .map_err(|_| $crate::types::id::IdError::Invalid(s.to_owned()))
            }

            /// Get the underlying `ObjectId` value.
            #[must_use]
            pub const fn as_object_id(&self) -> ::bson::oid::ObjectId {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl From<::bson::oid::ObjectId> for $name {
            fn from(id: ::bson::oid::ObjectId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::bson::oid::ObjectId {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<$name> for ::bson::Bson {
            fn from(id: $name) -> Self {
                Self::ObjectId(id.0)
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(SellerId);
define_id!(ProductId);
define_id!(CheckoutId);
define_id!(ReviewId);
define_id!(MessageId);
define_id!(CartId);
define_id!(WishlistId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_hex() {
        let id = ProductId::parse_str("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            SellerId::parse_str("not-an-object-id"),
            Err(IdError::Invalid(_))
        ));
        assert!(SellerId::parse_str("").is_err());
        assert!(SellerId::parse_str("507f1f77").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let id = UserId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let raw = bson::to_bson(&id).unwrap();
        assert_eq!(raw, bson::Bson::ObjectId(id.as_object_id()));
    }

    #[test]
    fn test_into_bson() {
        let id = CheckoutId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let value: bson::Bson = id.into();
        assert_eq!(value, bson::Bson::ObjectId(id.as_object_id()));
    }

    #[test]
    fn test_roundtrip_through_object_id() {
        let oid = bson::oid::ObjectId::new();
        let id = ReviewId::from(oid);
        let back: bson::oid::ObjectId = id.into();
        assert_eq!(back, oid);
    }
}
