//! Courier services available for cash-on-delivery orders.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a courier value is missing or unknown.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Please select a courier service")]
pub struct CourierError;

/// Courier service that delivers the order and collects payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Courier {
    Steadfast,
    Pathao,
    Redx,
    Paperfly,
}

impl Courier {
    /// Every courier, in display order.
    pub const ALL: [Self; 4] = [Self::Steadfast, Self::Pathao, Self::Redx, Self::Paperfly];

    /// Value sent to the order API and used in form fields.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Steadfast => "steadfast",
            Self::Pathao => "pathao",
            Self::Redx => "redx",
            Self::Paperfly => "paperfly",
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Steadfast => "Steadfast",
            Self::Pathao => "Pathao",
            Self::Redx => "RedX",
            Self::Paperfly => "Paperfly",
        }
    }
}

impl fmt::Display for Courier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Courier {
    type Err = CourierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|courier| courier.code() == s)
            .ok_or(CourierError)
    }
}
