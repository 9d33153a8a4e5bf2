//! Newtype IDs for externally assigned entity references.
//!
//! The catalog API hands out ids as either JSON numbers or strings depending
//! on the endpoint, so every id is stored in its string form and compared as
//! a string. Use the `define_id!` macro to create wrappers that prevent
//! accidentally mixing ids from different entity types.

/// Macro to define a type-safe external ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Deserialize` accepting a JSON string or number
/// - `Serialize` as a JSON string
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Display`
/// - Conversion methods: `new()`, `as_str()`, `is_truthy()`
///
/// # Example
///
/// ```rust
/// # use refabry_core::define_id;
/// define_id!(ShopId);
/// define_id!(BranchId);
///
/// let shop: ShopId = serde_json::from_str("42").unwrap();
/// assert_eq!(shop.as_str(), "42");
///
/// let branch: BranchId = serde_json::from_str("\"42\"").unwrap();
/// assert_eq!(branch.as_str(), shop.as_str());
///
/// // These are different types, so this won't compile:
/// // let _: ShopId = branch;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the id carries a usable value (non-empty and not `0`).
            #[must_use]
            pub fn is_truthy(&self) -> bool {
                !self.0.is_empty() && self.0 != "0"
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                match <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)? {
                    ::serde_json::Value::String(s) => Ok(Self(s)),
                    ::serde_json::Value::Number(n) => Ok(Self(n.to_string())),
                    other => Err(<D::Error as ::serde::de::Error>::custom(format!(
                        "expected string or number id, got {other}"
                    ))),
                }
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
