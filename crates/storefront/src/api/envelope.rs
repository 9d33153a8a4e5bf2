//! Payload extraction from Refabry response envelopes.
//!
//! The API wraps payloads twice: `{ "data": { "data": <payload> } }`. For the
//! collection endpoint the outer `data` is a Laravel paginator, so paging
//! metadata sits next to the inner `data`.

use refabry_core::Product;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// JSON pointer to the payload inside an envelope.
pub const PAYLOAD_POINTER: &str = "/data/data";

/// Decode the payload at [`PAYLOAD_POINTER`].
///
/// A missing or `null` payload is `Ok(None)`.
///
/// # Errors
///
/// Returns an error if a payload is present but does not decode as `T`.
pub fn payload<T: DeserializeOwned>(body: &Value) -> Result<Option<T>, serde_json::Error> {
    match body.pointer(PAYLOAD_POINTER) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value).map(Some),
    }
}

/// The product collection of a collection envelope, empty when absent.
///
/// # Errors
///
/// Returns an error if the collection is present but malformed.
pub fn products(body: &Value) -> Result<Vec<Product>, serde_json::Error> {
    Ok(payload(body)?.unwrap_or_default())
}

/// The product of a single-product envelope.
///
/// # Errors
///
/// Returns an error if the product is present but malformed.
pub fn product(body: &Value) -> Result<Option<Product>, serde_json::Error> {
    payload(body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_products_at_nested_path() {
        let body = json!({
            "status": true,
            "data": {
                "current_page": 1,
                "data": [
                    { "id": 1, "name": "A", "price": 100 },
                    { "id": 2, "name": "B", "price": "250" }
                ]
            }
        });

        let products = products(&body).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].id.as_str(), "2");
    }

    #[test]
    fn test_products_missing_path_is_empty() {
        assert!(products(&json!({ "status": true })).unwrap().is_empty());
        assert!(products(&json!({ "data": { "data": null } })).unwrap().is_empty());
        assert!(products(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_products_malformed_payload_is_error() {
        assert!(products(&json!({ "data": { "data": "nope" } })).is_err());
        assert!(products(&json!({ "data": { "data": [{ "id": 1 }] } })).is_err());
    }

    #[test]
    fn test_single_product() {
        let body = json!({ "data": { "data": { "id": 8, "name": "C", "price": 10 } } });
        assert_eq!(product(&body).unwrap().unwrap().name, "C");
        assert!(product(&json!({})).unwrap().is_none());
    }
}
