//! Phone number types.
//!
//! Customer phone numbers are stored as entered. Normalization to a
//! messaging-ready MSISDN happens only when composing a payment reminder,
//! via [`Phone::normalize`].

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when handling a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains no digits at all.
    #[error("phone number must contain digits")]
    NoDigits,
    /// After normalization the number is too short to message.
    #[error("phone number too short: {digits} digits (need at least 10)")]
    TooShort {
        /// Digit count after normalization.
        digits: usize,
    },
}

/// A phone number as entered by the user.
///
/// Only minimal validation is applied at parse time (non-empty, contains at
/// least one digit) so that local formatting conventions survive storage.
/// Strict rules apply when normalizing for outbound reminders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or contains no digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }
        if !trimmed.chars().any(|c| c.is_ascii_digit()) {
            return Err(PhoneError::NoDigits);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Normalize for outbound messaging.
    ///
    /// Rules:
    /// 1. Strip every non-digit character.
    /// 2. Drop a single leading zero, if present.
    /// 3. If exactly 10 digits remain, prefix `country_code`.
    /// 4. Anything shorter than 10 digits is rejected; anything longer is
    ///    assumed to already carry a country code and kept as-is.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::TooShort`] if fewer than 10 digits remain after
    /// steps 1-2.
    pub fn normalize(&self, country_code: &str) -> Result<Msisdn, PhoneError> {
        let mut digits: String = self.0.chars().filter(char::is_ascii_digit).collect();

        if digits.starts_with('0') {
            digits.remove(0);
        }

        match digits.len() {
            n if n < 10 => Err(PhoneError::TooShort { digits: n }),
            10 => Ok(Msisdn(format!("{country_code}{digits}"))),
            _ => Ok(Msisdn(digits)),
        }
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
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

/// A normalized, digits-only phone number ready for a messaging deep link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Msisdn(String);

impl Msisdn {
    /// Returns the normalized number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Msisdn` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Msisdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Phone::parse("9876543210").is_ok());
        assert!(Phone::parse("+91 98765-43210").is_ok());
        assert!(Phone::parse("  04412345678 ").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
        assert_eq!(Phone::parse("   "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_no_digits() {
        assert_eq!(Phone::parse("call me"), Err(PhoneError::NoDigits));
    }

    #[test]
    fn test_normalize_drops_leading_zero_and_prefixes() {
        let phone = Phone::parse("09876543210").unwrap();
        let msisdn = phone.normalize("91").unwrap();
        assert_eq!(msisdn.as_str(), "919876543210");
    }

    #[test]
    fn test_normalize_plain_ten_digits() {
        let phone = Phone::parse("9876543210").unwrap();
        assert_eq!(phone.normalize("91").unwrap().as_str(), "919876543210");
    }

    #[test]
    fn test_normalize_strips_formatting() {
        let phone = Phone::parse("+91 98765-43210").unwrap();
        // Already 12 digits after stripping, kept as-is
        assert_eq!(phone.normalize("91").unwrap().as_str(), "919876543210");
    }

    #[test]
    fn test_normalize_rejects_short_numbers() {
        let phone = Phone::parse("12345").unwrap();
        assert_eq!(
            phone.normalize("91"),
            Err(PhoneError::TooShort { digits: 5 })
        );
    }

    #[test]
    fn test_normalize_drops_only_one_zero() {
        // Only the first zero is dropped; 0123456789 keeps its 10 digits
        let phone = Phone::parse("00123456789").unwrap();
        assert_eq!(phone.normalize("91").unwrap().as_str(), "910123456789");
    }

    #[test]
    fn test_display_preserves_input() {
        let phone = Phone::parse("+91 98765 43210").unwrap();
        assert_eq!(phone.to_string(), "+91 98765 43210");
    }
}
