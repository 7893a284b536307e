//! Month bucket type.
//!
//! Deliveries and payments are grouped for billing by a year-month string
//! (`"2024-03"`). [`MonthKey`] is the validated form of that string.

use core::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`MonthKey`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MonthKeyError {
    /// The input is not in `YYYY-MM` form.
    #[error("month must be in YYYY-MM form")]
    Malformed,
    /// The month component is not 1-12.
    #[error("month component out of range: {0}")]
    MonthOutOfRange(u32),
}

/// A year-month bucket used to group deliveries and payments for billing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a `MonthKey` from its components.
    ///
    /// # Errors
    ///
    /// Returns [`MonthKeyError::MonthOutOfRange`] if `month` is not 1-12.
    pub const fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        if month == 0 || month > 12 {
            return Err(MonthKeyError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// The bucket containing a given instant.
    #[must_use]
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// The bucket containing the current instant.
    #[must_use]
    pub fn current() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Year component.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month component (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Parse a `MonthKey` from a `YYYY-MM` string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed or the month is out of range.
    pub fn parse(s: &str) -> Result<Self, MonthKeyError> {
        let (year_str, month_str) = s.split_once('-').ok_or(MonthKeyError::Malformed)?;
        if year_str.len() != 4 || month_str.len() != 2 {
            return Err(MonthKeyError::Malformed);
        }
        let year: i32 = year_str.parse().map_err(|_| MonthKeyError::Malformed)?;
        let month: u32 = month_str.parse().map_err(|_| MonthKeyError::Malformed)?;
        Self::new(year, month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// SQLx support (with postgres feature): stored as TEXT in YYYY-MM form.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for MonthKey {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for MonthKey {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for MonthKey {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.to_string(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_valid() {
        let key = MonthKey::parse("2024-03").unwrap();
        assert_eq!(key.year(), 2024);
        assert_eq!(key.month(), 3);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(MonthKey::parse("2024"), Err(MonthKeyError::Malformed));
        assert_eq!(MonthKey::parse("2024-3"), Err(MonthKeyError::Malformed));
        assert_eq!(MonthKey::parse("24-03"), Err(MonthKeyError::Malformed));
        assert_eq!(MonthKey::parse("2024/03"), Err(MonthKeyError::Malformed));
    }

    #[test]
    fn test_parse_rejects_month_out_of_range() {
        assert_eq!(
            MonthKey::parse("2024-13"),
            Err(MonthKeyError::MonthOutOfRange(13))
        );
        assert_eq!(
            MonthKey::parse("2024-00"),
            Err(MonthKeyError::MonthOutOfRange(0))
        );
    }

    #[test]
    fn test_display_zero_pads() {
        let key = MonthKey::new(2024, 3).unwrap();
        assert_eq!(key.to_string(), "2024-03");
    }

    #[test]
    fn test_from_datetime() {
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(MonthKey::from_datetime(at).to_string(), "2024-03");
    }

    #[test]
    fn test_ordering_is_chronological() {
        let feb = MonthKey::parse("2024-02").unwrap();
        let mar = MonthKey::parse("2024-03").unwrap();
        let jan_next = MonthKey::parse("2025-01").unwrap();
        assert!(feb < mar);
        assert!(mar < jan_next);
    }

    #[test]
    fn test_serde_roundtrip() {
        let key = MonthKey::parse("2024-03").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-03\"");
        let parsed: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }
}
