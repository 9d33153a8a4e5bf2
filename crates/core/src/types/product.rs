//! Catalog product as returned by the catalog API.
//!
//! Only `id`, `name` and `price` are required. The known optional fields are
//! typed; anything else the API sends is kept verbatim in [`Product::extra`]
//! so a newer API version does not break decoding.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::id::{CategoryId, ProductId};
use super::price::{self, Price};

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(default)]
    pub name: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default, with = "price::optional", skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<Price>,
    #[serde(default, with = "price::optional", skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Price>,
    /// Image filename on the image host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Fields this crate does not model, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Build a product with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            price,
            regular_price: None,
            discount_price: None,
            image: None,
            category: None,
            stock: None,
            sku: None,
            extra: Map::new(),
        }
    }

    /// Full image URL under `image_base`, or `None` when the product has no
    /// usable image reference.
    #[must_use]
    pub fn image_url(&self, image_base: &str) -> Option<String> {
        self.image
            .as_deref()
            .filter(|image| !image.trim().is_empty())
            .map(|image| format!("{}/{image}", image_base.trim_end_matches('/')))
    }

    /// Whether the product carries a non-zero discount price.
    #[must_use]
    pub fn has_discount_price(&self) -> bool {
        self.discount_price.is_some_and(|p| !p.is_zero())
    }

    /// Percentage off the regular price, when a regular price is known.
    #[must_use]
    pub fn discount_percent(&self) -> Option<i64> {
        self.regular_price
            .and_then(|regular| self.price.discount_percent_from(regular))
    }

    /// Category shown on the detail page: only with a truthy id.
    #[must_use]
    pub fn display_category(&self) -> Option<&Category> {
        self.category.as_ref().filter(|c| c.id.is_truthy())
    }

    /// Stock shown on the detail page: only when non-zero.
    #[must_use]
    pub fn display_stock(&self) -> Option<i64> {
        self.stock.filter(|stock| *stock != 0)
    }

    /// SKU shown on the detail page: only when non-empty.
    #[must_use]
    pub fn display_sku(&self) -> Option<&str> {
        self.sku.as_deref().filter(|sku| !sku.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Stock arrives as a number, a numeric string, or `null`.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid stock: {n}"))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid stock: {s}"))),
        other => Err(serde::de::Error::custom(format!("invalid stock: {other}"))),
    }
}
