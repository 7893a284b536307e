//! Delivery domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use bluedrop_core::{AccountId, BusinessId, CustomerId, DeliveryId, MonthKey, Role};

/// A recorded delivery event.
///
/// Immutable once created except for owner-only quantity edits, which must
/// re-diff the customer's running totals by the delta.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Delivery {
    /// Delivery ID.
    pub id: DeliveryId,
    /// Business scope.
    pub business_id: BusinessId,
    /// Customer this delivery was made to.
    pub customer_id: CustomerId,
    /// Units delivered (positive).
    pub quantity: i32,
    /// Billing bucket derived from `delivered_at`.
    pub month: MonthKey,
    /// When the delivery happened.
    pub delivered_at: DateTime<Utc>,
    /// Principal who recorded it.
    pub recorded_by: AccountId,
    /// Role label of the recorder at the time.
    pub recorded_by_role: Role,
}
