//! Customer phone number type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Local mobile numbers: `01`, an operator digit 3-9, then 8 more digits.
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^01[3-9]\d{8}$").expect("Invalid regex"));

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input is shorter than a full mobile number.
    #[error("Phone number must be at least {min} digits")]
    TooShort {
        /// Minimum number of characters.
        min: usize,
    },
    /// The input is long enough but is not a local mobile number.
    #[error("Must be a valid Bangladeshi phone number (e.g., 01712345678)")]
    InvalidFormat,
}

/// A Bangladeshi mobile phone number, e.g. `01712345678`.
///
/// ## Constraints
///
/// - At least 11 characters
/// - Starts with `01`, third digit in `3..=9`
/// - Exactly 11 digits in total
///
/// ## Examples
///
/// ```
/// use refabry_core::Phone;
///
/// assert!(Phone::parse("01712345678").is_ok());
///
/// assert!(Phone::parse("01212345678").is_err()); // operator digit 2
/// assert!(Phone::parse("0171234567").is_err());  // 10 digits
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Number of digits in a mobile number.
    pub const LENGTH: usize = 11;

    /// Parse a `Phone` from a string.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::TooShort`] when fewer than 11 characters remain,
    /// otherwise [`PhoneError::InvalidFormat`] if the pattern does not match.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();

        if s.chars().count() < Self::LENGTH {
            return Err(PhoneError::TooShort { min: Self::LENGTH });
        }

        if !MOBILE_RE.is_match(s) {
            return Err(PhoneError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
