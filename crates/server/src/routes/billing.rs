//! Billing route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use bluedrop_core::{CustomerId, MonthKey};

use crate::error::AppError;
use crate::middleware::{RequireOwner, RequireUser};
use crate::services::billing::BillingService;
use crate::state::AppState;

/// Request to mark a bill paid.
#[derive(Debug, Deserialize)]
pub struct MarkPaidRequest {
    /// Amount received. Recorded as given, not checked against the bill.
    pub amount: Decimal,
}

/// All bills of the business for one month.
pub async fn month_bills(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(month): Path<MonthKey>,
) -> Result<impl IntoResponse, AppError> {
    let bills = BillingService::new(&state)
        .bills_for_month(user.business_id, month, user.default_price)
        .await?;
    Ok(Json(bills))
}

/// One customer's bill for one month.
pub async fn customer_bill(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path((month, customer_id)): Path<(MonthKey, CustomerId)>,
) -> Result<impl IntoResponse, AppError> {
    let bill = BillingService::new(&state)
        .bill_for_customer(user.business_id, customer_id, month, user.default_price)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("no deliveries for customer {customer_id} in {month}"))
        })?;
    Ok(Json(bill))
}

/// Mark a customer's bill paid (owner only).
pub async fn mark_paid(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path((month, customer_id)): Path<(MonthKey, CustomerId)>,
    Json(req): Json<MarkPaidRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payment = BillingService::new(&state)
        .mark_paid(&owner, customer_id, month, req.amount)
        .await?;

    tracing::info!(customer_id = %customer_id, month = %month, "bill marked paid");
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Compose a WhatsApp payment reminder for a bill.
pub async fn reminder(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path((month, customer_id)): Path<(MonthKey, CustomerId)>,
) -> Result<impl IntoResponse, AppError> {
    let reminder = BillingService::new(&state)
        .reminder(
            user.business_id,
            customer_id,
            month,
            user.default_price,
            &user.business_name,
            &user.contact_phone,
        )
        .await?;
    Ok(Json(reminder))
}
