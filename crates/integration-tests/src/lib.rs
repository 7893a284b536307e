//! Integration tests for BlueDrop.
//!
//! # Running Tests
//!
//! ```bash
//! # Logic-level tests (no server or database needed)
//! cargo test -p bluedrop-integration-tests
//!
//! # Live API tests (ignored by default)
//! bd-cli migrate
//! cargo run -p bluedrop-server &
//! cargo test -p bluedrop-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `scan_flow` - scan state machine and tenancy rules
//! - `billing_rules` - monthly bill computation
//! - `domain_rules` - phone normalization, month buckets, QR payloads
//! - `live_api` - end-to-end tests against a running server

/// Base URL for the live server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("BLUEDROP_TEST_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store for session tests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
