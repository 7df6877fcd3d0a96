//! Product code type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `PROD-` followed by exactly four ASCII digits.
static PRODUCT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PROD-[0-9]{4}$").expect("Invalid regex"));

/// Errors that can occur when parsing a [`ProductCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductCodeError {
    /// The input string is empty.
    #[error("product code cannot be empty")]
    Empty,
    /// The input does not match `PROD-NNNN`.
    #[error("product code must match the format PROD-XXXX")]
    InvalidFormat,
}

/// A product code of the form `PROD-NNNN`.
///
/// ## Examples
///
/// ```
/// use product_desk_core::ProductCode;
///
/// assert!(ProductCode::parse("PROD-0001").is_ok());
///
/// assert!(ProductCode::parse("").is_err());
/// assert!(ProductCode::parse("PROD-1").is_err());
/// assert!(ProductCode::parse("prod-0001").is_err());
/// assert!(ProductCode::parse("PROD-00001").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ProductCode(String);

impl ProductCode {
    /// Parse a `ProductCode` from a string.
    ///
    /// The input is matched as-is; surrounding whitespace is not trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not of the form `PROD-NNNN`.
    pub fn parse(s: &str) -> Result<Self, ProductCodeError> {
        if s.is_empty() {
            return Err(ProductCodeError::Empty);
        }

        if !PRODUCT_CODE_RE.is_match(s) {
            return Err(ProductCodeError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the product code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ProductCode {
    type Err = ProductCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductCode {
    type Error = ProductCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductCode> for String {
    fn from(code: ProductCode) -> Self {
        code.0
    }
}

impl AsRef<str> for ProductCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_codes() {
        assert!(ProductCode::parse("PROD-0000").is_ok());
        assert!(ProductCode::parse("PROD-0001").is_ok());
        assert!(ProductCode::parse("PROD-9999").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductCode::parse(""), Err(ProductCodeError::Empty));
    }

    #[test]
    fn test_parse_wrong_format() {
        for input in [
            "PROD-1",
            "PROD-123",
            "PROD-12345",
            "prod-1234",
            "PROD1234",
            "PROD-12a4",
            " PROD-1234",
            "PROD-1234 ",
            "ITEM-1234",
            "PROD-١٢٣٤",
        ] {
            assert_eq!(
                ProductCode::parse(input),
                Err(ProductCodeError::InvalidFormat),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_deserialize_rejects_invalid_code() {
        assert!(serde_json::from_str::<ProductCode>("\"PROD-0001\"").is_ok());
        assert!(serde_json::from_str::<ProductCode>("\"PROD-1\"").is_err());
    }
}
