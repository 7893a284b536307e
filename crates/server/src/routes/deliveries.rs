//! Delivery route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use bluedrop_core::{CustomerId, DeliveryId, MonthKey};

use crate::db::deliveries::DeliveryRepository;
use crate::error::AppError;
use crate::middleware::{RequireOwner, RequireUser};
use crate::services::recorder::DeliveryRecorder;
use crate::state::AppState;

/// Request to record a delivery.
#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub customer_id: CustomerId,
    /// Units delivered; one can when absent.
    pub quantity: Option<i32>,
    /// Delivery time; now when absent.
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Request to edit a delivery's quantity.
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub quantity: i32,
}

/// Query parameters for the month listing.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    /// Month bucket; the current month when absent.
    pub month: Option<MonthKey>,
}

/// List the business's deliveries for one month.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, AppError> {
    let month = query.month.unwrap_or_else(MonthKey::current);
    let deliveries = DeliveryRepository::new(state.pool())
        .list_for_month(user.business_id, month)
        .await?;
    Ok(Json(deliveries))
}

/// Record a delivery (owner or staff).
pub async fn record(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(req): Json<RecordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let delivery = DeliveryRecorder::new(&state)
        .record(&user, req.customer_id, req.quantity, req.delivered_at)
        .await?;

    Ok((StatusCode::CREATED, Json(delivery)))
}

/// Edit a delivery's quantity (owner only).
pub async fn edit(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<DeliveryId>,
    Json(req): Json<EditRequest>,
) -> Result<impl IntoResponse, AppError> {
    let delivery = DeliveryRecorder::new(&state)
        .edit_quantity(&owner, id, req.quantity)
        .await?;
    Ok(Json(delivery))
}

/// Delete a delivery (owner only).
pub async fn delete(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<DeliveryId>,
) -> Result<impl IntoResponse, AppError> {
    DeliveryRecorder::new(&state).delete(&owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
