//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                  - Liveness check
//! GET  /health/ready                            - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/register                       - Owner signup (creates the business)
//! POST /api/auth/register-staff                 - Staff signup with invite code
//! POST /api/auth/login                          - Password login
//! POST /api/auth/logout                         - Sign out
//! GET  /api/auth/me                             - Current identity
//!
//! # Customers
//! GET    /api/customers?search=                 - List / search customers
//! POST   /api/customers                         - Create customer (owner)
//! GET    /api/customers/{id}                    - Customer detail
//! PUT    /api/customers/{id}                    - Edit customer (owner)
//! DELETE /api/customers/{id}                    - Delete customer + history (owner)
//! GET    /api/customers/{id}/deliveries         - Delivery history
//! POST   /api/customers/{id}/qr                 - Re-run QR provisioning (owner)
//!
//! # Deliveries
//! GET    /api/deliveries?month=                 - Month's deliveries
//! POST   /api/deliveries                        - Record a delivery
//! PUT    /api/deliveries/{id}                   - Edit quantity (owner)
//! DELETE /api/deliveries/{id}                   - Delete delivery (owner)
//!
//! # QR scan flow
//! POST /api/scan/start                          - Open the scanner
//! POST /api/scan/decode                         - Apply a decoded code
//! POST /api/scan/select                         - Pick a customer by hand
//! POST /api/scan/confirm                        - Confirm matched customer
//! POST /api/scan/submit                         - Submit quantity form
//! POST /api/scan/cancel                         - Abandon the flow
//!
//! # Billing
//! GET  /api/billing/{month}                     - All bills for a month
//! GET  /api/billing/{month}/customers/{id}      - One customer's bill
//! POST /api/billing/{month}/customers/{id}/paid - Mark paid (owner)
//! GET  /api/billing/{month}/customers/{id}/reminder - WhatsApp reminder link
//!
//! # Notifications
//! GET    /api/notifications?limit=              - Newest notifications
//! GET    /api/notifications/unread-count        - Badge number
//! POST   /api/notifications/{id}/read           - Mark read
//! DELETE /api/notifications/{id}                - Delete one
//! DELETE /api/notifications                     - Clear all
//!
//! # Settings & staff (owner)
//! GET    /api/settings                          - Business settings
//! PUT    /api/settings                          - Save settings (owner)
//! GET    /api/staff                             - Staff list (owner)
//! POST   /api/staff/invites                     - Issue invite code (owner)
//! DELETE /api/staff/{id}                        - Remove staff (owner)
//!
//! # Dashboard
//! GET  /api/dashboard                           - Current-month summary
//! ```

pub mod auth;
pub mod billing;
pub mod customers;
pub mod dashboard;
pub mod deliveries;
pub mod notifications;
pub mod scan;
pub mod settings;
pub mod staff;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register_owner))
        .route("/register-staff", post(auth::register_staff))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::list).post(customers::create))
        .route(
            "/{id}",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/{id}/deliveries", get(customers::deliveries))
        .route("/{id}/qr", post(customers::provision_qr))
}

/// Create the delivery routes router.
pub fn delivery_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(deliveries::list).post(deliveries::record))
        .route(
            "/{id}",
            put(deliveries::edit).delete(deliveries::delete),
        )
}

/// Create the scan flow router.
pub fn scan_routes() -> Router<AppState> {
    Router::new()
        .route("/start", post(scan::start))
        .route("/decode", post(scan::decode))
        .route("/select", post(scan::select))
        .route("/confirm", post(scan::confirm))
        .route("/submit", post(scan::submit))
        .route("/cancel", post(scan::cancel))
}

/// Create the billing routes router.
pub fn billing_routes() -> Router<AppState> {
    Router::new()
        .route("/{month}", get(billing::month_bills))
        .route("/{month}/customers/{id}", get(billing::customer_bill))
        .route("/{month}/customers/{id}/paid", post(billing::mark_paid))
        .route(
            "/{month}/customers/{id}/reminder",
            get(billing::reminder),
        )
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notifications::list).delete(notifications::clear_all),
        )
        .route("/unread-count", get(notifications::unread_count))
        .route("/{id}/read", post(notifications::mark_read))
        .route("/{id}", delete(notifications::delete))
}

/// Create the settings and staff routes router.
pub fn management_routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(settings::get).put(settings::update))
        .route("/staff", get(staff::list))
        .route("/staff/invites", post(staff::invite))
        .route("/staff/{id}", delete(staff::remove))
}

/// Assemble the full API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/customers", customer_routes())
        .nest("/deliveries", delivery_routes())
        .nest("/scan", scan_routes())
        .nest("/billing", billing_routes())
        .nest("/notifications", notification_routes())
        .route("/dashboard", get(dashboard::summary))
        .merge(management_routes())
}
