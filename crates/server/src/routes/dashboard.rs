//! Dashboard summary handler.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

use bluedrop_core::MonthKey;

use crate::db::deliveries::DeliveryRepository;
use crate::db::notifications::NotificationRepository;
use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::services::{billing::BillingService, registry::CustomerRegistry};
use crate::state::AppState;

/// The numbers shown on the home screen.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub month: MonthKey,
    pub customer_count: usize,
    pub deliveries_this_month: usize,
    pub units_this_month: i64,
    pub unpaid_bills: usize,
    pub unread_notifications: i64,
}

/// Current-month summary for the signed-in business.
pub async fn summary(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<impl IntoResponse, AppError> {
    let month = MonthKey::current();

    let customers = CustomerRegistry::new(&state).list(user.business_id).await?;
    let deliveries = DeliveryRepository::new(state.pool())
        .list_for_month(user.business_id, month)
        .await?;
    let bills = BillingService::new(&state)
        .bills_for_month(user.business_id, month, user.default_price)
        .await?;
    let unread = NotificationRepository::new(state.pool())
        .unread_count(user.business_id)
        .await?;

    Ok(Json(DashboardSummary {
        month,
        customer_count: customers.len(),
        deliveries_this_month: deliveries.len(),
        units_this_month: deliveries.iter().map(|d| i64::from(d.quantity)).sum(),
        unpaid_bills: bills.iter().filter(|b| !b.paid).count(),
        unread_notifications: unread,
    }))
}
