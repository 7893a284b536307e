//! Running-total reconciliation command.
//!
//! Delivery recording writes the delivery row and the customer's running
//! totals as two separate statements. A crash between them leaves the
//! totals behind the truth; this command rewrites every customer's totals
//! from the actual delivery sums.

use bluedrop_server::db::CustomerRepository;

use super::CliError;

/// Reconcile customer running totals against the delivery table.
///
/// # Errors
///
/// Returns `CliError` if the environment is incomplete or the rewrite
/// fails.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    tracing::info!("Reconciling customer totals...");
    let corrected = CustomerRepository::new(&pool)
        .reconcile_totals()
        .await
        .map_err(|e| match e {
            bluedrop_server::db::RepositoryError::Database(e) => CliError::Database(e),
            other => CliError::Database(sqlx::Error::Protocol(other.to_string())),
        })?;

    tracing::info!(corrected, "Reconciliation complete");
    #[allow(clippy::print_stdout)]
    {
        println!("Corrected {corrected} customer record(s)");
    }

    Ok(())
}
