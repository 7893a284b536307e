//! Account and business domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use bluedrop_core::{AccountId, BusinessId, InviteId, Role};

/// An authenticated principal: a business owner or a staff member.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    /// Unique account ID. For owners this doubles as the business ID.
    pub id: AccountId,
    /// Login email (unique).
    pub email: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Display name.
    pub display_name: String,
    /// Role of this principal.
    pub role: Role,
    /// For staff: the owner account this staff member belongs to.
    pub owner_link: Option<AccountId>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Business settings, keyed by the owner's account ID.
///
/// Staff sessions overlay these values onto their profile so the UI shows
/// business-level branding.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusinessProfile {
    /// Business identifier (the owner's account ID).
    pub id: BusinessId,
    /// Display name of the business.
    pub business_name: String,
    /// Default price per water can, used when a customer has no override.
    pub default_price: Decimal,
    /// Business contact phone shown in reminders.
    pub contact_phone: String,
    /// When the settings were last saved.
    pub updated_at: DateTime<Utc>,
}

/// An owner-issued invite code for staff signup.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StaffInvite {
    /// Invite ID.
    pub id: InviteId,
    /// Business the invited staff member will join.
    pub business_id: BusinessId,
    /// The code the staff member presents at signup.
    pub code: String,
    /// Email the invite was issued for.
    pub email: String,
    /// Whether the invite has been consumed.
    pub used: bool,
    /// When the invite was created.
    pub created_at: DateTime<Utc>,
}
