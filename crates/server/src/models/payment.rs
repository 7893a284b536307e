//! Payment domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use bluedrop_core::{AccountId, BusinessId, CustomerId, MonthKey, PaymentId};

/// A payment ledger entry.
///
/// Existence of a (customer, month) payment is the sole truth for "bill
/// paid"; the amount is the caller-supplied figure and is not cross-checked
/// against the billed total.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Payment {
    /// Payment ID.
    pub id: PaymentId,
    /// Business scope.
    pub business_id: BusinessId,
    /// Customer the payment settles.
    pub customer_id: CustomerId,
    /// Month bucket the payment settles.
    pub month: MonthKey,
    /// Amount recorded, as supplied by the caller.
    pub amount: Decimal,
    /// When the payment was marked.
    pub paid_at: DateTime<Utc>,
    /// Principal who marked it.
    pub recorded_by: AccountId,
}
