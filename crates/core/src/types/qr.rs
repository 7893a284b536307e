//! QR payload format.
//!
//! Every customer QR code encodes a colon-delimited triple binding the
//! customer to the business that provisioned it:
//!
//! ```text
//! BLUEDROP:<customerId>:<businessId>
//! ```
//!
//! The embedded business ID is the only cross-tenant isolation check in the
//! scan-to-delivery flow: a payload provisioned by another business must be
//! rejected before any customer lookup happens.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::{BusinessId, CustomerId};

/// Fixed literal identifying payloads produced by this system.
pub const QR_MARKER: &str = "BLUEDROP";

/// Errors that can occur when parsing a [`QrPayload`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QrPayloadError {
    /// The payload does not start with the [`QR_MARKER`] prefix.
    #[error("not a BlueDrop QR code")]
    MissingMarker,
    /// The payload does not have exactly three colon-delimited segments.
    #[error("malformed QR payload")]
    Malformed,
    /// A segment is not a valid UUID.
    #[error("malformed QR payload segment")]
    InvalidId,
}

/// A decoded customer QR payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    customer_id: CustomerId,
    business_id: BusinessId,
}

impl QrPayload {
    /// Bind a customer to the business provisioning its QR code.
    #[must_use]
    pub const fn new(customer_id: CustomerId, business_id: BusinessId) -> Self {
        Self {
            customer_id,
            business_id,
        }
    }

    /// The customer this payload references.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// The business that provisioned this payload.
    #[must_use]
    pub const fn business_id(&self) -> BusinessId {
        self.business_id
    }

    /// Whether this payload was provisioned by the given business.
    #[must_use]
    pub fn matches_business(&self, business_id: BusinessId) -> bool {
        self.business_id == business_id
    }

    /// Parse a payload string.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker is missing, the segment count is
    /// wrong, or either ID fails to parse. No I/O happens here; callers must
    /// still verify the business ID against their own before any lookup.
    pub fn parse(s: &str) -> Result<Self, QrPayloadError> {
        let rest = s
            .strip_prefix(QR_MARKER)
            .and_then(|r| r.strip_prefix(':'))
            .ok_or(QrPayloadError::MissingMarker)?;

        let (customer_str, business_str) =
            rest.split_once(':').ok_or(QrPayloadError::Malformed)?;
        if business_str.contains(':') {
            return Err(QrPayloadError::Malformed);
        }

        let customer_id: CustomerId =
            customer_str.parse().map_err(|_| QrPayloadError::InvalidId)?;
        let business_id: BusinessId =
            business_str.parse().map_err(|_| QrPayloadError::InvalidId)?;

        Ok(Self {
            customer_id,
            business_id,
        })
    }
}

impl fmt::Display for QrPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{QR_MARKER}:{}:{}", self.customer_id, self.business_id)
    }
}

impl std::str::FromStr for QrPayload {
    type Err = QrPayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse_roundtrip() {
        let payload = QrPayload::new(CustomerId::generate(), BusinessId::generate());
        let encoded = payload.to_string();
        assert!(encoded.starts_with("BLUEDROP:"));
        assert_eq!(QrPayload::parse(&encoded).unwrap(), payload);
    }

    #[test]
    fn test_parse_rejects_foreign_marker() {
        let customer = CustomerId::generate();
        let business = BusinessId::generate();
        let foreign = format!("OTHERAPP:{customer}:{business}");
        assert_eq!(
            QrPayload::parse(&foreign),
            Err(QrPayloadError::MissingMarker)
        );
    }

    #[test]
    fn test_parse_rejects_missing_segments() {
        let customer = CustomerId::generate();
        assert_eq!(
            QrPayload::parse(&format!("BLUEDROP:{customer}")),
            Err(QrPayloadError::Malformed)
        );
        assert_eq!(
            QrPayload::parse("BLUEDROP"),
            Err(QrPayloadError::MissingMarker)
        );
    }

    #[test]
    fn test_parse_rejects_extra_segments() {
        let customer = CustomerId::generate();
        let business = BusinessId::generate();
        assert_eq!(
            QrPayload::parse(&format!("BLUEDROP:{customer}:{business}:extra")),
            Err(QrPayloadError::Malformed)
        );
    }

    #[test]
    fn test_parse_rejects_bad_ids() {
        assert_eq!(
            QrPayload::parse("BLUEDROP:not-a-uuid:also-not"),
            Err(QrPayloadError::InvalidId)
        );
    }

    #[test]
    fn test_matches_business() {
        let business = BusinessId::generate();
        let payload = QrPayload::new(CustomerId::generate(), business);
        assert!(payload.matches_business(business));
        assert!(!payload.matches_business(BusinessId::generate()));
    }
}
