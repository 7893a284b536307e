//! CLI command implementations.

pub mod migrate;
pub mod owner;
pub mod reconcile;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// The configured app id is not a usable schema name.
    #[error("Invalid BLUEDROP_APP_ID: must be a lowercase identifier (a-z, 0-9, _)")]
    InvalidAppId,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Resolve the database URL from the environment.
pub fn database_url() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    std::env::var("BLUEDROP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("BLUEDROP_DATABASE_URL"))
}

/// Resolve the namespace schema from the environment.
pub fn app_id() -> Result<String, CliError> {
    let app_id = std::env::var("BLUEDROP_APP_ID").unwrap_or_else(|_| "bluedrop".to_owned());

    let valid = !app_id.is_empty()
        && app_id.chars().next().is_some_and(|c| c.is_ascii_lowercase())
        && app_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        return Err(CliError::InvalidAppId);
    }

    Ok(app_id)
}

/// Connect a schema-pinned pool using the standard server settings.
pub async fn connect() -> Result<PgPool, CliError> {
    let url = database_url()?;
    let schema = app_id()?;
    let pool = bluedrop_server::db::create_pool(&url, &schema).await?;
    Ok(pool)
}
