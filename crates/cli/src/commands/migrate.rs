//! Database migration command.
//!
//! Creates the namespace schema if it does not exist, then applies the
//! server's migrations inside it. The sqlx migration bookkeeping table
//! lands in the same schema, so independently namespaced deployments
//! sharing one database track their migrations separately.

use super::CliError;

/// Run database migrations.
///
/// # Errors
///
/// Returns `CliError` if the environment is incomplete, the schema cannot
/// be created, or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let schema = super::app_id()?;
    let pool = super::connect().await?;

    tracing::info!(schema = %schema, "Ensuring schema exists...");
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS \"{schema}\""))
        .execute(&pool)
        .await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
