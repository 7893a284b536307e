//! Monthly billing.
//!
//! A bill is always computed from the month's delivery rows, never from
//! the customer's running totals, so billing stays correct even when the
//! totals have drifted. Paid status is decided purely by the presence of a
//! payment record for the (customer, month) pair.

use rust_decimal::Decimal;
use serde::Serialize;

use bluedrop_core::{BusinessId, CustomerId, MonthKey, Msisdn, PaymentId};

use crate::db::customers::CustomerRepository;
use crate::db::deliveries::DeliveryRepository;
use crate::db::payments::PaymentRepository;
use crate::error::AppError;
use crate::middleware::OwnerSession;
use crate::models::{Customer, Delivery, Payment};
use crate::services::notifier::Notifier;
use crate::state::AppState;

/// A computed monthly bill for one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bill {
    /// Customer billed.
    pub customer_id: CustomerId,
    /// Customer name at computation time.
    pub customer_name: String,
    /// Month bucket.
    pub month: MonthKey,
    /// Total units delivered in the month.
    pub units: i32,
    /// Number of delivery events in the month.
    pub delivery_count: i32,
    /// Price per unit applied (customer override or business default).
    pub price_per_unit: Decimal,
    /// Billed amount: units times price.
    pub amount: Decimal,
    /// Whether a payment record exists for this bill.
    pub paid: bool,
}

/// A composed payment reminder.
#[derive(Debug, Clone, Serialize)]
pub struct Reminder {
    /// Human-readable reminder text.
    pub message: String,
    /// WhatsApp deep link carrying the text.
    pub whatsapp_url: String,
    /// Normalized recipient number.
    pub phone: String,
}

/// Compute a customer's bill from their deliveries in one month.
///
/// Returns `None` when the customer had no deliveries that month; absence
/// of a bill and a zero bill are different things, and only the former is
/// skipped in the billing view.
#[must_use]
pub fn compute_bill(
    customer: &Customer,
    deliveries: &[Delivery],
    month: MonthKey,
    business_default_price: Decimal,
    paid: bool,
) -> Option<Bill> {
    let in_month: Vec<&Delivery> = deliveries
        .iter()
        .filter(|d| d.customer_id == customer.id && d.month == month)
        .collect();

    if in_month.is_empty() {
        return None;
    }

    let units: i32 = in_month.iter().map(|d| d.quantity).sum();
    let price = customer.effective_price(business_default_price);

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let delivery_count = in_month.len() as i32;

    Some(Bill {
        customer_id: customer.id,
        customer_name: customer.name.clone(),
        month,
        units,
        delivery_count,
        price_per_unit: price,
        amount: Decimal::from(units) * price,
        paid,
    })
}

/// Billing service.
pub struct BillingService<'a> {
    state: &'a AppState,
}

impl<'a> BillingService<'a> {
    /// Create a new billing service over the shared state.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Compute every bill of a business for one month.
    ///
    /// Customers without deliveries that month are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if a load fails.
    pub async fn bills_for_month(
        &self,
        business: BusinessId,
        month: MonthKey,
        default_price: Decimal,
    ) -> Result<Vec<Bill>, AppError> {
        let customers = CustomerRepository::new(self.state.pool()).list(business).await?;
        let deliveries = DeliveryRepository::new(self.state.pool())
            .list_for_month(business, month)
            .await?;
        let payments = PaymentRepository::new(self.state.pool())
            .list_for_month(business, month)
            .await?;

        let bills = customers
            .iter()
            .filter_map(|customer| {
                let paid = payments.iter().any(|p| p.customer_id == customer.id);
                compute_bill(customer, &deliveries, month, default_price, paid)
            })
            .collect();

        Ok(bills)
    }

    /// Compute one customer's bill for one month.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the customer doesn't exist.
    pub async fn bill_for_customer(
        &self,
        business: BusinessId,
        customer_id: CustomerId,
        month: MonthKey,
        default_price: Decimal,
    ) -> Result<Option<Bill>, AppError> {
        let customer = CustomerRepository::new(self.state.pool())
            .get(business, customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("customer {customer_id}")))?;
        let deliveries = DeliveryRepository::new(self.state.pool())
            .list_for_customer_month(business, customer_id, month)
            .await?;
        let paid = PaymentRepository::new(self.state.pool())
            .exists(business, customer_id, month)
            .await?;

        Ok(compute_bill(&customer, &deliveries, month, default_price, paid))
    }

    /// Mark a customer's monthly bill paid (owner only).
    ///
    /// The amount is recorded as given; it is a bookkeeping figure and is
    /// not checked against the computed bill.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` if the month is already marked paid.
    /// Returns `AppError::NotFound` if the customer doesn't exist.
    pub async fn mark_paid(
        &self,
        owner: &OwnerSession,
        customer_id: CustomerId,
        month: MonthKey,
        amount: Decimal,
    ) -> Result<Payment, AppError> {
        let business = owner.user().business_id;

        let customer = CustomerRepository::new(self.state.pool())
            .get(business, customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("customer {customer_id}")))?;

        let payments = PaymentRepository::new(self.state.pool());
        if payments.exists(business, customer_id, month).await? {
            return Err(AppError::Conflict(format!(
                "{month} is already marked paid for {}",
                customer.name
            )));
        }

        let payment = Payment {
            id: PaymentId::generate(),
            business_id: business,
            customer_id,
            month,
            amount,
            paid_at: chrono::Utc::now(),
            recorded_by: owner.user().account_id,
        };
        payments.insert(&payment).await?;

        Notifier::new(self.state)
            .payment_marked(
                business,
                owner.user().account_id,
                &customer.name,
                month,
                amount,
            )
            .await;

        Ok(payment)
    }

    /// Compose a WhatsApp payment reminder for an unpaid bill.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the customer has no bill that month.
    /// Returns `AppError::Validation` if the customer's phone cannot be
    /// normalized for WhatsApp.
    pub async fn reminder(
        &self,
        business: BusinessId,
        customer_id: CustomerId,
        month: MonthKey,
        default_price: Decimal,
        business_name: &str,
        contact_phone: &str,
    ) -> Result<Reminder, AppError> {
        let customer = CustomerRepository::new(self.state.pool())
            .get(business, customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("customer {customer_id}")))?;

        let bill = self
            .bill_for_customer(business, customer_id, month, default_price)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("no deliveries for {} in {month}", customer.name))
            })?;

        let msisdn = customer
            .phone
            .normalize(&self.state.config().country_code)
            .map_err(|e| AppError::Validation(format!("cannot message {}: {e}", customer.name)))?;

        let message = reminder_message(&bill, business_name, contact_phone);
        let whatsapp_url = whatsapp_link(&msisdn, &message);

        Ok(Reminder {
            message,
            whatsapp_url,
            phone: msisdn.into_inner(),
        })
    }
}

/// Build the reminder text for a bill.
fn reminder_message(bill: &Bill, business_name: &str, contact_phone: &str) -> String {
    format!(
        "Hello {name}, your water can bill for {month} is \u{20b9}{amount} \
         ({units} cans at \u{20b9}{price} each). Please pay at your convenience. \
         - {business_name} ({contact_phone})",
        name = bill.customer_name,
        month = bill.month,
        amount = bill.amount,
        units = bill.units,
        price = bill.price_per_unit,
    )
}

/// Build a wa.me deep link with the message URL-encoded.
fn whatsapp_link(msisdn: &Msisdn, message: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
    format!("https://wa.me/{}?text={encoded}", msisdn.as_str())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bluedrop_core::{AccountId, BusinessId, CustomerCategory, DeliveryId, Phone, Role};
    use chrono::{TimeZone, Utc};

    fn customer(business: BusinessId, price_override: Option<Decimal>) -> Customer {
        Customer {
            id: CustomerId::generate(),
            business_id: business,
            name: "Ravi Kumar".to_owned(),
            phone: Phone::parse("9876543210").unwrap(),
            address: "14 Lake View Road".to_owned(),
            category: CustomerCategory::Home,
            price_per_unit: price_override,
            total_units: 0,
            total_deliveries: 0,
            qr_payload: None,
            qr_image_url: None,
            created_at: Utc::now(),
        }
    }

    fn delivery(customer: &Customer, day: u32, quantity: i32) -> Delivery {
        let delivered_at = Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap();
        Delivery {
            id: DeliveryId::generate(),
            business_id: customer.business_id,
            customer_id: customer.id,
            quantity,
            month: MonthKey::from_datetime(delivered_at),
            delivered_at,
            recorded_by: AccountId::generate(),
            recorded_by_role: Role::Staff,
        }
    }

    #[test]
    fn test_bill_sums_month_deliveries_at_default_price() {
        let business = BusinessId::generate();
        let ravi = customer(business, None);
        let deliveries = vec![
            delivery(&ravi, 3, 2),
            delivery(&ravi, 11, 1),
            delivery(&ravi, 24, 3),
        ];
        let month = MonthKey::new(2026, 3).unwrap();

        let bill = compute_bill(&ravi, &deliveries, month, Decimal::from(25), false).unwrap();
        assert_eq!(bill.units, 6);
        assert_eq!(bill.delivery_count, 3);
        assert_eq!(bill.price_per_unit, Decimal::from(25));
        assert_eq!(bill.amount, Decimal::from(150));
        assert!(!bill.paid);
    }

    #[test]
    fn test_bill_prefers_customer_price_override() {
        let business = BusinessId::generate();
        let ravi = customer(business, Some(Decimal::from(20)));
        let deliveries = vec![delivery(&ravi, 5, 4)];
        let month = MonthKey::new(2026, 3).unwrap();

        let bill = compute_bill(&ravi, &deliveries, month, Decimal::from(25), false).unwrap();
        assert_eq!(bill.amount, Decimal::from(80));
    }

    #[test]
    fn test_no_deliveries_means_no_bill() {
        let business = BusinessId::generate();
        let ravi = customer(business, None);
        let month = MonthKey::new(2026, 3).unwrap();

        assert!(compute_bill(&ravi, &[], month, Decimal::from(25), false).is_none());
    }

    #[test]
    fn test_bill_ignores_other_months_and_customers() {
        let business = BusinessId::generate();
        let ravi = customer(business, None);
        let priya = customer(business, None);
        let mut deliveries = vec![delivery(&ravi, 10, 2)];
        deliveries.push(delivery(&priya, 12, 5));

        let april = MonthKey::new(2026, 4).unwrap();
        assert!(compute_bill(&ravi, &deliveries, april, Decimal::from(25), false).is_none());

        let march = MonthKey::new(2026, 3).unwrap();
        let bill = compute_bill(&ravi, &deliveries, march, Decimal::from(25), false).unwrap();
        assert_eq!(bill.units, 2);
    }

    #[test]
    fn test_paid_flag_carried_through() {
        let business = BusinessId::generate();
        let ravi = customer(business, None);
        let deliveries = vec![delivery(&ravi, 1, 1)];
        let month = MonthKey::new(2026, 3).unwrap();

        let bill = compute_bill(&ravi, &deliveries, month, Decimal::from(25), true).unwrap();
        assert!(bill.paid);
    }

    #[test]
    fn test_whatsapp_link_encodes_message() {
        let phone = Phone::parse("9876543210").unwrap();
        let msisdn = phone.normalize("91").unwrap();
        let link = whatsapp_link(&msisdn, "Hello Ravi, bill \u{20b9}150");

        assert!(link.starts_with("https://wa.me/919876543210?text="));
        assert!(!link.contains(' '));
    }

    #[test]
    fn test_reminder_message_contents() {
        let month = MonthKey::new(2026, 3).unwrap();
        let bill = Bill {
            customer_id: CustomerId::generate(),
            customer_name: "Ravi Kumar".to_owned(),
            month,
            units: 6,
            delivery_count: 3,
            price_per_unit: Decimal::from(25),
            amount: Decimal::from(150),
            paid: false,
        };

        let message = reminder_message(&bill, "Sharma Waters", "9000000000");
        assert!(message.contains("Ravi Kumar"));
        assert!(message.contains("2026-03"));
        assert!(message.contains("150"));
        assert!(message.contains("Sharma Waters"));
    }
}
