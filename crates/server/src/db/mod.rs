//! Database operations for BlueDrop `PostgreSQL`.
//!
//! Every read and write for customers, deliveries, payments, notifications,
//! and accounts funnels through the repositories in this module, always
//! scoped by the effective business ID. The whole data set lives in a
//! single schema selected by `BLUEDROP_APP_ID` (default `bluedrop`), which
//! is how one database can host independently namespaced deployments.
//!
//! ## Tables
//!
//! - `account` / `business` / `staff_invite` - principals and settings
//! - `customer` - customer records with running delivery totals
//! - `delivery` - delivery events, bucketed by month for billing
//! - `payment` - payments ledger (existence == paid)
//! - `notification` - business-scoped notification log
//! - `session` - tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p bluedrop-cli -- migrate
//! ```

pub mod accounts;
pub mod customers;
pub mod deliveries;
pub mod notifications;
pub mod payments;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use accounts::AccountRepository;
pub use customers::CustomerRepository;
pub use deliveries::DeliveryRepository;
pub use notifications::NotificationRepository;
pub use payments::PaymentRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// Every connection pins its `search_path` to `schema`, which namespaces
/// all data access for this deployment.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `schema` - namespace schema name (validated by config loading)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    schema: &str,
) -> Result<PgPool, sqlx::Error> {
    let schema = schema.to_owned();
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .after_connect(move |conn, _meta| {
            let set_path = format!("SET search_path TO \"{schema}\", public");
            Box::pin(async move {
                sqlx::Executor::execute(conn, set_path.as_str()).await?;
                Ok(())
            })
        })
        .connect(database_url.expose_secret())
        .await
}
