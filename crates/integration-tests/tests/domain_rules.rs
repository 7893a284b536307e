//! Integration tests for core domain rules shared across the app.

use bluedrop_core::{
    BusinessId, CustomerId, MonthKey, Phone, PhoneError, QrPayload, QrPayloadError,
};

// =============================================================================
// Phone Normalization (WhatsApp reminders)
// =============================================================================

#[test]
fn test_ten_digit_number_gets_country_code() {
    let phone = Phone::parse("9876543210").expect("valid phone");
    let msisdn = phone.normalize("91").expect("normalizable");
    assert_eq!(msisdn.as_str(), "919876543210");
}

#[test]
fn test_leading_zero_dropped_before_prefixing() {
    let phone = Phone::parse("09876543210").expect("valid phone");
    let msisdn = phone.normalize("91").expect("normalizable");
    assert_eq!(msisdn.as_str(), "919876543210");
}

#[test]
fn test_formatted_input_is_cleaned() {
    let phone = Phone::parse("098-765 43210").expect("valid phone");
    let msisdn = phone.normalize("91").expect("normalizable");
    assert_eq!(msisdn.as_str(), "919876543210");
}

#[test]
fn test_longer_numbers_pass_through_without_prefix() {
    // Already carries a country code
    let phone = Phone::parse("+91 98765 43210").expect("valid phone");
    let msisdn = phone.normalize("91").expect("normalizable");
    assert_eq!(msisdn.as_str(), "919876543210");
}

#[test]
fn test_short_numbers_are_unusable_for_reminders() {
    let phone = Phone::parse("12345").expect("parseable as a stored phone");
    assert!(matches!(
        phone.normalize("91"),
        Err(PhoneError::TooShort { digits: 5 })
    ));
}

// =============================================================================
// Month Buckets
// =============================================================================

#[test]
fn test_month_key_display_round_trips() {
    let march = MonthKey::new(2026, 3).expect("valid month");
    assert_eq!(march.to_string(), "2026-03");
    assert_eq!(MonthKey::parse("2026-03").expect("parses"), march);
}

#[test]
fn test_month_keys_order_chronologically() {
    let dec_2025 = MonthKey::parse("2025-12").expect("parses");
    let jan_2026 = MonthKey::parse("2026-01").expect("parses");
    let mar_2026 = MonthKey::parse("2026-03").expect("parses");

    assert!(dec_2025 < jan_2026);
    assert!(jan_2026 < mar_2026);
}

#[test]
fn test_month_key_rejects_sloppy_formats() {
    for raw in ["2026-3", "2026/03", "03-2026", "2026-13", "2026-00", "march"] {
        assert!(MonthKey::parse(raw).is_err(), "should reject {raw:?}");
    }
}

// =============================================================================
// QR Payloads
// =============================================================================

#[test]
fn test_qr_payload_round_trips_through_text() {
    let payload = QrPayload::new(CustomerId::generate(), BusinessId::generate());
    let parsed = QrPayload::parse(&payload.to_string()).expect("parses");

    assert_eq!(parsed.customer_id(), payload.customer_id());
    assert_eq!(parsed.business_id(), payload.business_id());
}

#[test]
fn test_qr_payload_requires_marker() {
    let customer = CustomerId::generate();
    let business = BusinessId::generate();
    let raw = format!("AQUATAG:{customer}:{business}");

    assert!(matches!(
        QrPayload::parse(&raw),
        Err(QrPayloadError::MissingMarker)
    ));
}

#[test]
fn test_qr_payload_business_match() {
    let business = BusinessId::generate();
    let payload = QrPayload::new(CustomerId::generate(), business);

    assert!(payload.matches_business(business));
    assert!(!payload.matches_business(BusinessId::generate()));
}
