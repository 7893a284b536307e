//! Owner account management command.

use std::io::Write;

use rust_decimal::Decimal;
use thiserror::Error;

use bluedrop_server::services::auth::{AuthError, AuthService};

use super::CliError;

/// Errors that can occur during owner creation.
#[derive(Debug, Error)]
pub enum OwnerError {
    #[error(transparent)]
    Cli(#[from] CliError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Failed to read password: {0}")]
    Io(#[from] std::io::Error),
}

/// Create a business owner account.
///
/// When no password is supplied on the command line it is read from
/// stdin, so the password stays out of shell history.
///
/// # Errors
///
/// Returns `OwnerError` if the environment is incomplete, the password
/// cannot be read, or the account cannot be created.
pub async fn create(
    email: &str,
    name: &str,
    business: &str,
    price: Decimal,
    phone: &str,
    password: Option<String>,
) -> Result<(), OwnerError> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };

    let pool = super::connect().await?;

    let account = AuthService::new(&pool)
        .register_owner(email, &password, name, business, price, phone)
        .await?;

    tracing::info!(account_id = %account.id, email = %account.email, "Owner account created");
    #[allow(clippy::print_stdout)]
    {
        println!("Created owner account {} ({})", account.id, account.email);
        println!("Business ID: {}", account.id.as_business());
    }

    Ok(())
}

/// Read a password from stdin.
fn read_password() -> Result<String, std::io::Error> {
    #[allow(clippy::print_stdout)]
    {
        print!("Password (min 8 chars): ");
    }
    std::io::stdout().flush()?;

    let mut password = String::new();
    std::io::stdin().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_owned())
}
