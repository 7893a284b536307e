//! Customer route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use bluedrop_core::CustomerId;

use crate::db::deliveries::DeliveryRepository;
use crate::error::AppError;
use crate::middleware::{RequireOwner, RequireUser};
use crate::models::{CustomerUpdate, NewCustomer};
use crate::services::{qr, registry::CustomerRegistry};
use crate::state::AppState;

/// Query parameters for the customer list.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Optional case-insensitive search term.
    pub search: Option<String>,
}

/// List or search customers.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let registry = CustomerRegistry::new(&state);

    let customers = match query.search {
        Some(ref term) if !term.trim().is_empty() => {
            registry.search(user.business_id, term).await?
        }
        _ => registry.list(user.business_id).await?.as_ref().clone(),
    };

    Ok(Json(customers))
}

/// Get one customer.
pub async fn get(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<CustomerId>,
) -> Result<impl IntoResponse, AppError> {
    let customer = CustomerRegistry::new(&state)
        .get(user.business_id, id)
        .await?;
    Ok(Json(customer))
}

/// Create a customer (owner only).
pub async fn create(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Json(new): Json<NewCustomer>,
) -> Result<impl IntoResponse, AppError> {
    let customer = CustomerRegistry::new(&state)
        .create(owner.user().business_id, new)
        .await?;

    tracing::info!(customer_id = %customer.id, "customer created");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Edit a customer (owner only).
pub async fn update(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<CustomerId>,
    Json(fields): Json<CustomerUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let customer = CustomerRegistry::new(&state)
        .update(owner.user().business_id, id, fields)
        .await?;
    Ok(Json(customer))
}

/// Delete a customer and their delivery history (owner only).
pub async fn delete(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<CustomerId>,
) -> Result<impl IntoResponse, AppError> {
    CustomerRegistry::new(&state)
        .delete(owner.user().business_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a customer's deliveries, newest first.
pub async fn deliveries(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<CustomerId>,
) -> Result<impl IntoResponse, AppError> {
    // 404 for customers outside this business before listing
    CustomerRegistry::new(&state).get(user.business_id, id).await?;

    let deliveries = DeliveryRepository::new(state.pool())
        .list_for_customer(user.business_id, id)
        .await?;
    Ok(Json(deliveries))
}

/// Re-run QR provisioning for a customer (owner only).
///
/// Provisioning is asynchronous and best-effort; this returns as soon as
/// the job is queued.
pub async fn provision_qr(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<CustomerId>,
) -> Result<impl IntoResponse, AppError> {
    let customer = CustomerRegistry::new(&state)
        .get(owner.user().business_id, id)
        .await?;

    tokio::spawn(async move {
        qr::provision(&state, &customer).await;
    });

    Ok(StatusCode::ACCEPTED)
}
