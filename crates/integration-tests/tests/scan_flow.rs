//! Integration tests for the QR scan pipeline state machine.
//!
//! These exercise the transition rules and tenancy checks without a
//! session store or database.

use rust_decimal::Decimal;

use bluedrop_core::{AccountId, BusinessId, CustomerId, QrPayload, Role};
use bluedrop_server::models::CurrentUser;
use bluedrop_server::services::scan::{ScanError, ScanState};

fn staff_session(business_id: BusinessId) -> CurrentUser {
    CurrentUser {
        account_id: AccountId::generate(),
        business_id,
        display_name: "Meena".to_owned(),
        role: Role::Staff,
        business_name: "Sharma Waters".to_owned(),
        default_price: Decimal::from(25),
        contact_phone: "9876543210".to_owned(),
    }
}

// =============================================================================
// Happy Path
// =============================================================================

#[test]
fn test_scan_to_recorded_delivery_flow() {
    let business = BusinessId::generate();
    let customer = CustomerId::generate();
    let user = staff_session(business);
    let code = QrPayload::new(customer, business).to_string();

    let state = ScanState::Idle.start();
    assert_eq!(state, ScanState::Scanning);

    let state = state.decode(&code, &user).expect("decode should match");
    assert_eq!(
        state,
        ScanState::CandidateFound {
            customer_id: customer
        }
    );

    let state = state.confirm().expect("candidate should confirm");
    let (submitted, state) = state.submit().expect("form should submit");

    assert_eq!(submitted, customer);
    assert_eq!(state, ScanState::Idle);
}

// =============================================================================
// Tenancy and Validation
// =============================================================================

#[test]
fn test_foreign_business_code_rejected_before_lookup() {
    let user = staff_session(BusinessId::generate());
    let foreign_code = QrPayload::new(CustomerId::generate(), BusinessId::generate()).to_string();

    // The rejection happens purely in the state machine, proving no
    // customer lookup is needed to refuse the code.
    assert_eq!(
        ScanState::Scanning.decode(&foreign_code, &user),
        Err(ScanError::ForeignBusiness)
    );
}

#[test]
fn test_non_bluedrop_codes_rejected() {
    let user = staff_session(BusinessId::generate());

    for raw in [
        "",
        "https://example.com/some/menu",
        "WIFI:S:cafe;P:password;;",
        "BLUEDROP:not-a-uuid:also-not-a-uuid",
    ] {
        assert!(
            matches!(
                ScanState::Scanning.decode(raw, &user),
                Err(ScanError::UnrecognizedCode(_))
            ),
            "should reject {raw:?}"
        );
    }
}

#[test]
fn test_decode_only_legal_while_scanning() {
    let business = BusinessId::generate();
    let user = staff_session(business);
    let code = QrPayload::new(CustomerId::generate(), business).to_string();

    assert_eq!(
        ScanState::Idle.decode(&code, &user),
        Err(ScanError::NotScanning)
    );
    assert_eq!(
        ScanState::FormOpen {
            customer_id: CustomerId::generate()
        }
        .decode(&code, &user),
        Err(ScanError::NotScanning)
    );
}

// =============================================================================
// Ordering and Reset
// =============================================================================

#[test]
fn test_skipping_stages_is_rejected() {
    assert_eq!(ScanState::Idle.confirm(), Err(ScanError::NoCandidate));
    assert_eq!(ScanState::Scanning.submit(), Err(ScanError::NoOpenForm));
    assert_eq!(
        ScanState::CandidateFound {
            customer_id: CustomerId::generate()
        }
        .submit(),
        Err(ScanError::NoOpenForm)
    );
}

#[test]
fn test_cancel_resets_every_stage() {
    let customer_id = CustomerId::generate();

    assert_eq!(ScanState::Idle.cancel(), ScanState::Idle);
    assert_eq!(ScanState::Scanning.cancel(), ScanState::Idle);
    assert_eq!(
        ScanState::CandidateFound { customer_id }.cancel(),
        ScanState::Idle
    );
    assert_eq!(ScanState::FormOpen { customer_id }.cancel(), ScanState::Idle);
}

#[test]
fn test_manual_pick_skips_the_scanner() {
    // Torn or unreadable codes fall back to choosing the customer by hand,
    // which needs no open scanner.
    let customer_id = CustomerId::generate();

    let state = ScanState::Idle.select(customer_id);
    assert_eq!(state, ScanState::CandidateFound { customer_id });

    let state = state.confirm().expect("picked customer should confirm");
    let (submitted, state) = state.submit().expect("form should submit");
    assert_eq!(submitted, customer_id);
    assert_eq!(state, ScanState::Idle);
}

#[test]
fn test_restart_discards_in_flight_candidate() {
    let state = ScanState::CandidateFound {
        customer_id: CustomerId::generate(),
    };
    assert_eq!(state.start(), ScanState::Scanning);
}

#[test]
fn test_scan_state_survives_session_serialization() {
    let customer_id = CustomerId::generate();
    let state = ScanState::FormOpen { customer_id };

    let json = serde_json::to_string(&state).expect("serialize");
    let restored: ScanState = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(restored, state);
}
