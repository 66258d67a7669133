//! Buyer address types.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::error::CheckoutError;
use crate::types::Email;

/// A Mexican postal code: exactly five ASCII digits.
///
/// Construction is the only place format validation happens, so an
/// [`CheckoutError::InvalidPostalCode`] is always raised before any lookup
/// is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Number of digits in a postal code.
    pub const LENGTH: usize = 5;

    /// Parse a postal code, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidPostalCode`] unless the trimmed input
    /// is exactly five ASCII digits.
    pub fn parse(s: &str) -> Result<Self, CheckoutError> {
        let trimmed = s.trim();
        if trimmed.len() == Self::LENGTH && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(CheckoutError::InvalidPostalCode {
                input: s.to_owned(),
            })
        }
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A buyer address fully resolved through the postal-code directory.
///
/// Colony, municipality and state are directory output, never free-form
/// buyer input; the compatibility check relies on them matching the
/// vocabulary artisans registered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub postal_code: PostalCode,
    pub colony: String,
    pub municipality: String,
    pub state: String,
}

/// Buyer contact details collected in the shipping step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerContact {
    pub full_name: String,
    pub email: Email,
    pub phone: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let code = PostalCode::parse("68000").unwrap();
        assert_eq!(code.as_str(), "68000");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(PostalCode::parse(" 68000 ").unwrap().as_str(), "68000");
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        // Mixed alphanumerics must be rejected before any lookup runs.
        assert!(matches!(
            PostalCode::parse("12A45"),
            Err(CheckoutError::InvalidPostalCode { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(PostalCode::parse("1234").is_err());
        assert!(PostalCode::parse("123456").is_err());
        assert!(PostalCode::parse("").is_err());
    }
}
