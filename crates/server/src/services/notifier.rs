//! Notification writer.
//!
//! Builds and appends the business-scoped notification records that other
//! services emit after their primary write. Appends are best-effort: a lost
//! notification never fails the operation that produced it.

use chrono::Utc;
use rust_decimal::Decimal;

use bluedrop_core::{AccountId, BusinessId, MonthKey, NotificationId, NotificationKind};

use crate::db::notifications::NotificationRepository;
use crate::models::Notification;
use crate::state::AppState;

/// Notification service.
pub struct Notifier<'a> {
    state: &'a AppState,
}

impl<'a> Notifier<'a> {
    /// Create a new notifier over the shared state.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Record that a delivery was logged.
    pub async fn delivery_recorded(
        &self,
        business: BusinessId,
        actor: AccountId,
        actor_name: &str,
        customer_name: &str,
        quantity: i32,
    ) {
        let unit = if quantity == 1 { "can" } else { "cans" };
        self.append(Notification {
            id: NotificationId::generate(),
            business_id: business,
            title: "Delivery recorded".to_owned(),
            message: format!("{actor_name} delivered {quantity} {unit} to {customer_name}"),
            kind: NotificationKind::Delivery,
            read: false,
            created_at: Utc::now(),
            created_by: actor,
        })
        .await;
    }

    /// Record that a monthly bill was marked paid.
    pub async fn payment_marked(
        &self,
        business: BusinessId,
        actor: AccountId,
        customer_name: &str,
        month: MonthKey,
        amount: Decimal,
    ) {
        self.append(Notification {
            id: NotificationId::generate(),
            business_id: business,
            title: "Payment received".to_owned(),
            message: format!("{customer_name} paid \u{20b9}{amount} for {month}"),
            kind: NotificationKind::Payment,
            read: false,
            created_at: Utc::now(),
            created_by: actor,
        })
        .await;
    }

    /// Record a general event.
    pub async fn info(&self, business: BusinessId, actor: AccountId, title: &str, message: &str) {
        self.append(Notification {
            id: NotificationId::generate(),
            business_id: business,
            title: title.to_owned(),
            message: message.to_owned(),
            kind: NotificationKind::Info,
            read: false,
            created_at: Utc::now(),
            created_by: actor,
        })
        .await;
    }

    async fn append(&self, notification: Notification) {
        if let Err(e) = NotificationRepository::new(self.state.pool())
            .insert(&notification)
            .await
        {
            tracing::warn!(error = %e, title = %notification.title, "notification append failed");
        }
    }
}
