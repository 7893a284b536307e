//! End-to-end tests against a running server.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (bd-cli migrate)
//! - The server running (cargo run -p bluedrop-server)
//!
//! Run with: cargo test -p bluedrop-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use bluedrop_integration_tests::{base_url, client};

/// Register a fresh owner and return the signed-in client.
async fn signed_in_owner() -> (reqwest::Client, Value) {
    let client = client();
    let email = format!("owner-{}@example.com", Uuid::new_v4());

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "email": email,
            "password": "sturdy-password-1",
            "display_name": "Test Owner",
            "business_name": "Test Waters",
            "default_price": "25",
            "contact_phone": "9876543210",
        }))
        .send()
        .await
        .expect("register request");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let user: Value = resp.json().await.expect("register body");
    (client, user)
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_health_endpoints() {
    let client = client();

    let resp = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("health request");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("readiness request");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_api_requires_session() {
    let client = client();

    let resp = client
        .get(format!("{}/api/customers", base_url()))
        .send()
        .await
        .expect("customers request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_customer_lifecycle_and_delivery() {
    let (client, _user) = signed_in_owner().await;

    // Create a customer
    let resp = client
        .post(format!("{}/api/customers", base_url()))
        .json(&json!({
            "name": "Ravi Kumar",
            "phone": "9876543210",
            "address": "14 Lake View Road",
            "category": "home",
        }))
        .send()
        .await
        .expect("create customer");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let customer: Value = resp.json().await.expect("customer body");
    let customer_id = customer["id"].as_str().expect("customer id").to_owned();

    // Record a delivery of two cans
    let resp = client
        .post(format!("{}/api/deliveries", base_url()))
        .json(&json!({ "customer_id": customer_id, "quantity": 2 }))
        .send()
        .await
        .expect("record delivery");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Totals reflect the delivery
    let resp = client
        .get(format!("{}/api/customers/{customer_id}", base_url()))
        .send()
        .await
        .expect("get customer");
    let fetched: Value = resp.json().await.expect("customer body");
    assert_eq!(fetched["total_units"], 2);
    assert_eq!(fetched["total_deliveries"], 1);

    // Clean up
    let resp = client
        .delete(format!("{}/api/customers/{customer_id}", base_url()))
        .send()
        .await
        .expect("delete customer");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

/// Create a customer under the given client and return its id.
async fn create_customer(client: &reqwest::Client, name: &str) -> String {
    let resp = client
        .post(format!("{}/api/customers", base_url()))
        .json(&json!({
            "name": name,
            "phone": "9876543210",
            "address": "14 Lake View Road",
        }))
        .send()
        .await
        .expect("create customer");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let customer: Value = resp.json().await.expect("customer body");
    customer["id"].as_str().expect("customer id").to_owned()
}

/// Record a delivery and return the delivery id.
async fn record_delivery(client: &reqwest::Client, customer_id: &str, quantity: i32) -> String {
    let resp = client
        .post(format!("{}/api/deliveries", base_url()))
        .json(&json!({ "customer_id": customer_id, "quantity": quantity }))
        .send()
        .await
        .expect("record delivery");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let delivery: Value = resp.json().await.expect("delivery body");
    delivery["id"].as_str().expect("delivery id").to_owned()
}

/// Fetch a customer's (total_units, total_deliveries).
async fn totals(client: &reqwest::Client, customer_id: &str) -> (i64, i64) {
    let resp = client
        .get(format!("{}/api/customers/{customer_id}", base_url()))
        .send()
        .await
        .expect("get customer");
    let customer: Value = resp.json().await.expect("customer body");
    (
        customer["total_units"].as_i64().expect("total_units"),
        customer["total_deliveries"].as_i64().expect("total_deliveries"),
    )
}

async fn delete_customer(client: &reqwest::Client, customer_id: &str) {
    let resp = client
        .delete(format!("{}/api/customers/{customer_id}", base_url()))
        .send()
        .await
        .expect("delete customer");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_delivery_edit_moves_totals_by_exactly_the_delta() {
    let (client, _user) = signed_in_owner().await;
    let customer_id = create_customer(&client, "Priya Stores").await;
    let delivery_id = record_delivery(&client, &customer_id, 2).await;
    assert_eq!(totals(&client, &customer_id).await, (2, 1));

    // Edit 2 -> 5: units move by the delta, the delivery count does not
    let resp = client
        .put(format!("{}/api/deliveries/{delivery_id}", base_url()))
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .expect("edit delivery");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(totals(&client, &customer_id).await, (5, 1));

    // Editing to the same quantity again is a no-op
    let resp = client
        .put(format!("{}/api/deliveries/{delivery_id}", base_url()))
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .expect("edit delivery again");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(totals(&client, &customer_id).await, (5, 1));

    delete_customer(&client, &customer_id).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_delivery_delete_then_rerecord_restores_totals() {
    let (client, _user) = signed_in_owner().await;
    let customer_id = create_customer(&client, "Hotel Annapurna").await;
    record_delivery(&client, &customer_id, 2).await;
    let second = record_delivery(&client, &customer_id, 3).await;
    assert_eq!(totals(&client, &customer_id).await, (5, 2));

    // Delete reverts the full quantity and one delivery
    let resp = client
        .delete(format!("{}/api/deliveries/{second}", base_url()))
        .send()
        .await
        .expect("delete delivery");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(totals(&client, &customer_id).await, (2, 1));

    // Re-recording an identical delivery lands back on the old totals
    record_delivery(&client, &customer_id, 3).await;
    assert_eq!(totals(&client, &customer_id).await, (5, 2));

    delete_customer(&client, &customer_id).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_concurrent_deliveries_all_land_in_totals() {
    let (client, _user) = signed_in_owner().await;
    let customer_id = create_customer(&client, "Corner Shop").await;

    // The totals update is a server-side increment, so overlapping
    // recordings from the same business must all land.
    let handles: Vec<_> = (1..=4)
        .map(|quantity| {
            let client = client.clone();
            let customer_id = customer_id.clone();
            tokio::spawn(async move { record_delivery(&client, &customer_id, quantity).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("recording task");
    }

    assert_eq!(totals(&client, &customer_id).await, (10, 4));

    delete_customer(&client, &customer_id).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_staff_cannot_manage_customers() {
    let (owner, _user) = signed_in_owner().await;

    // Owner invites a staff member
    let staff_email = format!("staff-{}@example.com", Uuid::new_v4());
    let resp = owner
        .post(format!("{}/api/staff/invites", base_url()))
        .json(&json!({ "email": staff_email }))
        .send()
        .await
        .expect("issue invite");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invite: Value = resp.json().await.expect("invite body");
    let code = invite["code"].as_str().expect("invite code");

    // Staff signs up with the invite
    let staff = client();
    let resp = staff
        .post(format!("{}/api/auth/register-staff", base_url()))
        .json(&json!({
            "email": staff_email,
            "password": "sturdy-password-2",
            "display_name": "Test Staff",
            "invite_code": code,
        }))
        .send()
        .await
        .expect("staff register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Staff can read customers but not create them
    let resp = staff
        .get(format!("{}/api/customers", base_url()))
        .send()
        .await
        .expect("staff list customers");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = staff
        .post(format!("{}/api/customers", base_url()))
        .json(&json!({
            "name": "Should Fail",
            "phone": "9876543210",
            "address": "Nowhere",
        }))
        .send()
        .await
        .expect("staff create customer");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
