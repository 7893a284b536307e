//! Identity resolution.
//!
//! Turns an authenticated account into the session identity: the resolved
//! role plus the effective business scope every later data access uses.
//! Staff accounts are folded into their owner's business here, so nothing
//! downstream ever branches on role to find its data.

use sqlx::PgPool;

use bluedrop_core::Role;

use crate::db::accounts::AccountRepository;
use crate::error::AppError;
use crate::models::{Account, CurrentUser};

/// Resolve an account into its session identity.
///
/// For owners the business scope is the account's own ID. For staff it is
/// the owner link; a staff account without one is broken data and refuses
/// to resolve rather than silently scoping to itself.
///
/// The business profile overlay (name, default price, contact phone) is
/// best-effort: if the profile row cannot be read the session still
/// resolves, with the account's own name and zeroed business fields, and
/// the failure is logged.
///
/// # Errors
///
/// Returns `AppError::Configuration` for a staff account with no owner link.
pub async fn resolve(pool: &PgPool, account: &Account) -> Result<CurrentUser, AppError> {
    let business_id = match account.role {
        Role::Owner => account.id.as_business(),
        Role::Staff => account
            .owner_link
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "staff account {} has no owner link",
                    account.id
                ))
            })?
            .as_business(),
    };

    let mut user = CurrentUser {
        account_id: account.id,
        business_id,
        display_name: account.display_name.clone(),
        role: account.role,
        business_name: account.display_name.clone(),
        default_price: rust_decimal::Decimal::ZERO,
        contact_phone: String::new(),
    };

    match AccountRepository::new(pool).get_business(business_id).await {
        Ok(Some(profile)) => {
            user.business_name = profile.business_name;
            user.default_price = profile.default_price;
            user.contact_phone = profile.contact_phone;
        }
        Ok(None) => {
            tracing::warn!(business_id = %business_id, "business profile row missing");
        }
        Err(e) => {
            tracing::warn!(error = %e, business_id = %business_id, "business profile lookup failed");
        }
    }

    Ok(user)
}
