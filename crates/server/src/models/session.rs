//! Session-held identity types.
//!
//! The resolved identity (role plus effective business scope) is stored in
//! the session at login and read back by the auth extractors.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bluedrop_core::{AccountId, BusinessId, Role};

/// Session-stored identity of the logged-in principal.
///
/// `business_id` is always the *effective* business scope: the account's own
/// ID for owners, the owner link for staff. The business branding fields are
/// overlaid at login so staff sessions display business-level, not
/// staff-level, identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The principal's own account ID.
    pub account_id: AccountId,
    /// Effective business scope for all data access.
    pub business_id: BusinessId,
    /// The principal's display name.
    pub display_name: String,
    /// Resolved role.
    pub role: Role,
    /// Business display name (owner's, even for staff sessions).
    pub business_name: String,
    /// Business default price per unit.
    pub default_price: Decimal,
    /// Business contact phone.
    pub contact_phone: String,
}

impl CurrentUser {
    /// Whether this session belongs to the business owner.
    #[must_use]
    pub const fn is_owner(&self) -> bool {
        matches!(self.role, Role::Owner)
    }
}

/// Session keys for authentication and flow state.
pub mod keys {
    /// Key for storing the current logged-in principal.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the QR scan pipeline state.
    pub const SCAN_STATE: &str = "scan_state";
}
