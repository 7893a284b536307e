//! Authentication service.
//!
//! Owner signup, invite-gated staff signup, and password login.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::PgPool;

use bluedrop_core::{AccountId, BusinessId, Email};

use crate::db::RepositoryError;
use crate::db::accounts::AccountRepository;
use crate::models::{Account, StaffInvite};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Length of generated staff invite codes.
const INVITE_CODE_LENGTH: usize = 8;

/// Alphabet for invite codes. No 0/O or 1/I, codes get read out loud.
const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Authentication service.
///
/// Handles account registration, login, and staff invites.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    /// Register a new business owner.
    ///
    /// Creates the account and its business settings row in one step.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::AccountAlreadyExists` if the email is already registered.
    pub async fn register_owner(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        business_name: &str,
        default_price: Decimal,
        contact_phone: &str,
    ) -> Result<Account, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let account = self
            .accounts
            .create_owner(
                email.as_str(),
                &password_hash,
                display_name,
                business_name,
                default_price,
                contact_phone,
            )
            .await
            .map_err(conflict_to_exists)?;

        Ok(account)
    }

    /// Register a staff member against an owner-issued invite code.
    ///
    /// The invite is consumed on success so the code cannot be replayed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInvite` if the code is unknown, already
    /// used, or was issued for a different email.
    /// Returns `AuthError::AccountAlreadyExists` if the email is already
    /// registered.
    pub async fn register_staff(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        invite_code: &str,
    ) -> Result<Account, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let invite = self
            .accounts
            .get_invite_by_code(invite_code.trim())
            .await?
            .ok_or_else(|| AuthError::InvalidInvite("unknown or used invite code".to_owned()))?;

        if !invite.email.eq_ignore_ascii_case(email.as_str()) {
            return Err(AuthError::InvalidInvite(
                "invite was issued for a different email".to_owned(),
            ));
        }

        let password_hash = hash_password(password)?;
        let owner = AccountId::new(invite.business_id.as_uuid());

        let account = self
            .accounts
            .create_staff(email.as_str(), &password_hash, display_name, owner)
            .await
            .map_err(conflict_to_exists)?;

        self.accounts.mark_invite_used(invite.id).await?;

        Ok(account)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let email = Email::parse(email)?;

        let account = self
            .accounts
            .get_by_email(email.as_str())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &account.password_hash)?;

        Ok(account)
    }

    /// Issue a staff invite code for an email address.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn issue_invite(
        &self,
        business: BusinessId,
        email: &str,
    ) -> Result<StaffInvite, AuthError> {
        let email = Email::parse(email)?;
        let code = generate_invite_code();

        let invite = self
            .accounts
            .create_invite(business, email.as_str(), &code)
            .await?;

        Ok(invite)
    }
}

fn conflict_to_exists(e: RepositoryError) -> AuthError {
    match e {
        RepositoryError::Conflict(_) => AuthError::AccountAlreadyExists,
        other => AuthError::Repository(other),
    }
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Generate a random invite code.
fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..INVITE_CODE_ALPHABET.len());
            INVITE_CODE_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_generate_invite_code_shape() {
        let code = generate_invite_code();
        assert_eq!(code.len(), INVITE_CODE_LENGTH);
        assert!(code.bytes().all(|b| INVITE_CODE_ALPHABET.contains(&b)));
    }
}
