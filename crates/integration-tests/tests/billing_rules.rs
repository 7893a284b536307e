//! Integration tests for monthly bill computation.
//!
//! Bills are computed from delivery rows alone, so these run without a
//! database.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use bluedrop_core::{
    AccountId, BusinessId, CustomerCategory, CustomerId, DeliveryId, MonthKey, Phone, Role,
};
use bluedrop_server::models::{Customer, Delivery};
use bluedrop_server::services::billing::compute_bill;

fn customer(business: BusinessId, name: &str, price_override: Option<Decimal>) -> Customer {
    Customer {
        id: CustomerId::generate(),
        business_id: business,
        name: name.to_owned(),
        phone: Phone::parse("9876543210").expect("valid phone"),
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

fn delivery(customer: &Customer, year: i32, month: u32, day: u32, quantity: i32) -> Delivery {
    let delivered_at = Utc
        .with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid timestamp");
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
fn test_month_of_deliveries_bills_at_default_price() {
    let business = BusinessId::generate();
    let ravi = customer(business, "Ravi Kumar", None);
    let deliveries = vec![
        delivery(&ravi, 2026, 3, 2, 2),
        delivery(&ravi, 2026, 3, 13, 1),
        delivery(&ravi, 2026, 3, 27, 3),
    ];
    let march = MonthKey::new(2026, 3).expect("valid month");

    let bill = compute_bill(&ravi, &deliveries, march, Decimal::from(25), false)
        .expect("deliveries should produce a bill");

    assert_eq!(bill.units, 6);
    assert_eq!(bill.delivery_count, 3);
    assert_eq!(bill.amount, Decimal::from(150));
    assert!(!bill.paid);
}

#[test]
fn test_customer_price_override_beats_business_default() {
    let business = BusinessId::generate();
    let hotel = customer(business, "Hotel Annapurna", Some(Decimal::from(22)));
    let deliveries = vec![delivery(&hotel, 2026, 3, 5, 10)];
    let march = MonthKey::new(2026, 3).expect("valid month");

    let bill = compute_bill(&hotel, &deliveries, march, Decimal::from(25), false)
        .expect("deliveries should produce a bill");

    assert_eq!(bill.price_per_unit, Decimal::from(22));
    assert_eq!(bill.amount, Decimal::from(220));
}

#[test]
fn test_discounted_customer_month_end_to_end() {
    // A customer on a negotiated 20-per-can rate takes 2 cans then 3 cans
    // in March while the business default is 25.
    let business = BusinessId::generate();
    let ravi = customer(business, "Ravi Kumar", Some(Decimal::from(20)));
    let deliveries = vec![delivery(&ravi, 2026, 3, 4, 2), delivery(&ravi, 2026, 3, 19, 3)];
    let march = MonthKey::new(2026, 3).expect("valid month");

    let before = compute_bill(&ravi, &deliveries, march, Decimal::from(25), false)
        .expect("deliveries should produce a bill");
    assert_eq!(before.units, 5);
    assert_eq!(before.amount, Decimal::from(100));
    assert!(!before.paid);

    // Once a payment record exists the same month reads as paid.
    let after = compute_bill(&ravi, &deliveries, march, Decimal::from(25), true)
        .expect("deliveries should produce a bill");
    assert!(after.paid);
}

#[test]
fn test_quiet_month_produces_no_bill() {
    let business = BusinessId::generate();
    let ravi = customer(business, "Ravi Kumar", None);
    let deliveries = vec![delivery(&ravi, 2026, 3, 2, 2)];

    let april = MonthKey::new(2026, 4).expect("valid month");
    assert!(compute_bill(&ravi, &deliveries, april, Decimal::from(25), false).is_none());
}

#[test]
fn test_other_customers_deliveries_are_excluded() {
    let business = BusinessId::generate();
    let ravi = customer(business, "Ravi Kumar", None);
    let priya = customer(business, "Priya Stores", None);

    let deliveries = vec![
        delivery(&ravi, 2026, 3, 2, 2),
        delivery(&priya, 2026, 3, 2, 8),
    ];
    let march = MonthKey::new(2026, 3).expect("valid month");

    let bill = compute_bill(&ravi, &deliveries, march, Decimal::from(25), false)
        .expect("deliveries should produce a bill");
    assert_eq!(bill.units, 2);
}

#[test]
fn test_paid_status_reflects_payment_presence_only() {
    let business = BusinessId::generate();
    let ravi = customer(business, "Ravi Kumar", None);
    let deliveries = vec![delivery(&ravi, 2026, 3, 2, 2)];
    let march = MonthKey::new(2026, 3).expect("valid month");

    // The paid flag comes from payment existence; the bill amount does not
    // change with it.
    let unpaid = compute_bill(&ravi, &deliveries, march, Decimal::from(25), false)
        .expect("bill");
    let paid = compute_bill(&ravi, &deliveries, march, Decimal::from(25), true)
        .expect("bill");

    assert!(!unpaid.paid);
    assert!(paid.paid);
    assert_eq!(unpaid.amount, paid.amount);
}

#[test]
fn test_fractional_prices_kept_exact() {
    let business = BusinessId::generate();
    let shop = customer(
        business,
        "Corner Shop",
        Some(Decimal::new(2250, 2)), // 22.50
    );
    let deliveries = vec![delivery(&shop, 2026, 3, 8, 3)];
    let march = MonthKey::new(2026, 3).expect("valid month");

    let bill = compute_bill(&shop, &deliveries, march, Decimal::from(25), false)
        .expect("bill");
    assert_eq!(bill.amount, Decimal::new(6750, 2)); // 67.50
}
