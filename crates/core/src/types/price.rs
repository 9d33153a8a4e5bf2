//! Type-safe price representation using decimal arithmetic.
//!
//! All prices in the storefront are Bangladeshi Taka. The catalog API sends
//! amounts either as JSON numbers or as numeric strings, so [`Price`] accepts
//! both on the way in and always writes a plain decimal string on the way out.

use core::fmt;
use core::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Currency symbol used when displaying prices.
pub const CURRENCY_SYMBOL: &str = "৳";

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A price in Taka.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero Taka.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of Taka.
    #[must_use]
    pub fn from_whole(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Parse a price from its textual form.
    ///
    /// Accepts plain decimals (`"750"`, `"750.50"`) and scientific notation
    /// (`"7.5e2"`).
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] if the input is not a number.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Self)
            .map_err(|_| PriceError::Invalid(s.to_owned()))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiply by a quantity, saturating at the largest representable
    /// amount.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// The amount as the upstream API expects it: `"680"`, `"479.5"`.
    #[must_use]
    pub fn to_wire(&self) -> String {
        self.0.normalize().to_string()
    }

    /// Whole-number percentage drop from `regular` to `self`.
    ///
    /// Computes `round((regular - self) / regular * 100)` with halves rounded
    /// up. Returns `None` when `regular` is zero or the ratio does not fit a
    /// decimal.
    ///
    /// ```
    /// use refabry_core::Price;
    ///
    /// let sale = Price::from_whole(750);
    /// assert_eq!(sale.discount_percent_from(Price::from_whole(1000)), Some(25));
    /// assert_eq!(sale.discount_percent_from(Price::ZERO), None);
    /// ```
    #[must_use]
    pub fn discount_percent_from(&self, regular: Self) -> Option<i64> {
        if regular.is_zero() {
            return None;
        }
        let ratio = regular
            .0
            .checked_sub(self.0)?
            .checked_div(regular.0)?
            .checked_mul(Decimal::ONE_HUNDRED)?;
        let rounded = ratio.checked_add(Decimal::new(5, 1))?.floor();
        i64::try_from(rounded).ok()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL}{}", self.0.normalize())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => Self::parse(&n.to_string()),
            serde_json::Value::String(s) => Self::parse(&s),
            other => Err(PriceError::Invalid(other.to_string())),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// Serde helper for optional prices.
///
/// Missing fields, `null`, and empty strings all read as `None`; the catalog
/// API uses each of them for "no price".
pub mod optional {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Price;

    /// Deserialize an optional price.
    ///
    /// # Errors
    ///
    /// Returns an error if a present value is not a number.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Price>, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
            serde_json::Value::String(s) => {
                Price::parse(&s).map(Some).map_err(serde::de::Error::custom)
            }
            serde_json::Value::Number(n) => Price::parse(&n.to_string())
                .map(Some)
                .map_err(serde::de::Error::custom),
            other => Err(serde::de::Error::custom(format!("invalid price: {other}"))),
        }
    }

    /// Serialize an optional price as a string or `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(price: &Option<Price>, serializer: S) -> Result<S::Ok, S::Error> {
        match price {
            Some(p) => serializer.serialize_str(&p.to_wire()),
            None => serializer.serialize_none(),
        }
    }
}
