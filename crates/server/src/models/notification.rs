//! Notification domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use bluedrop_core::{AccountId, BusinessId, NotificationId, NotificationKind};

/// A business-scoped notification record.
///
/// Notifications belong to the business, not to individual users; owner and
/// staff read the same log.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    /// Notification ID.
    pub id: NotificationId,
    /// Business scope.
    pub business_id: BusinessId,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Kind, used for badge styling.
    pub kind: NotificationKind,
    /// Whether the notification has been read.
    pub read: bool,
    /// When the notification was appended.
    pub created_at: DateTime<Utc>,
    /// Principal whose action produced it.
    pub created_by: AccountId,
}
