//! Customer domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bluedrop_core::{BusinessId, CustomerCategory, CustomerId, Phone};

/// A customer of a business.
///
/// `total_units` / `total_deliveries` are running totals maintained by
/// atomic increments on every delivery write; they are never recomputed
/// inline, so they can drift from the true delivery sum after a partial
/// multi-write failure.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Customer {
    /// Customer ID.
    pub id: CustomerId,
    /// Owning business.
    pub business_id: BusinessId,
    /// Customer name.
    pub name: String,
    /// Contact phone, as entered.
    pub phone: Phone,
    /// Delivery address.
    pub address: String,
    /// Category (home/shop/office/hotel/restaurant/general).
    pub category: CustomerCategory,
    /// Per-unit price override; `None` means the business default applies.
    pub price_per_unit: Option<Decimal>,
    /// Running total of units delivered.
    pub total_units: i32,
    /// Running count of deliveries.
    pub total_deliveries: i32,
    /// Provisioned QR payload string, if provisioning has succeeded.
    pub qr_payload: Option<String>,
    /// Hosted QR image URL, if provisioning has succeeded.
    pub qr_image_url: Option<String>,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// The price per unit that applies to this customer.
    #[must_use]
    pub fn effective_price(&self, business_default: Decimal) -> Decimal {
        self.price_per_unit.unwrap_or(business_default)
    }

    /// Case-insensitive substring match over name, phone, and address.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.phone.as_str().to_lowercase().contains(&term)
            || self.address.to_lowercase().contains(&term)
    }
}

/// Fields for creating a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    /// Customer name (required).
    pub name: String,
    /// Contact phone (required).
    pub phone: String,
    /// Delivery address (required).
    pub address: String,
    /// Category; defaults to general.
    #[serde(default)]
    pub category: CustomerCategory,
    /// Per-unit price override; business default applies when absent.
    pub price_per_unit: Option<Decimal>,
}

/// Fields for an owner-only customer edit. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub category: Option<CustomerCategory>,
    pub price_per_unit: Option<Decimal>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bluedrop_core::Phone;

    fn sample() -> Customer {
        Customer {
            id: CustomerId::generate(),
            business_id: BusinessId::generate(),
            name: "Ravi Kumar".to_owned(),
            phone: Phone::parse("09876543210").unwrap(),
            address: "14 Lake View Road".to_owned(),
            category: CustomerCategory::Home,
            price_per_unit: None,
            total_units: 0,
            total_deliveries: 0,
            qr_payload: None,
            qr_image_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_effective_price_prefers_override() {
        let mut customer = sample();
        assert_eq!(
            customer.effective_price(Decimal::from(25)),
            Decimal::from(25)
        );
        customer.price_per_unit = Some(Decimal::from(20));
        assert_eq!(
            customer.effective_price(Decimal::from(25)),
            Decimal::from(20)
        );
    }

    #[test]
    fn test_matches_search_is_case_insensitive() {
        let customer = sample();
        assert!(customer.matches_search("ravi"));
        assert!(customer.matches_search("LAKE VIEW"));
        assert!(customer.matches_search("98765"));
        assert!(!customer.matches_search("priya"));
    }
}
