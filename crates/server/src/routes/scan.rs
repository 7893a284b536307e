//! QR scan route handlers.
//!
//! These drive the session-held scan state machine. The client opens the
//! scanner, posts each decoded code, confirms the matched customer, and
//! submits the quantity form, which records the delivery.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use bluedrop_core::CustomerId;

use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::services::{recorder::DeliveryRecorder, scan::ScanService};
use crate::state::AppState;

/// A decoded QR code from the client.
#[derive(Debug, Deserialize)]
pub struct DecodeRequest {
    pub code: String,
}

/// Quantity form submission.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Units delivered; one can when absent.
    pub quantity: Option<i32>,
}

/// Manual customer pick for unreadable codes.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub customer_id: CustomerId,
}

/// Open the scanner.
pub async fn start(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let scan_state = ScanService::new(&state, &session).start().await?;
    Ok(Json(scan_state))
}

/// Apply a decoded code; returns the matched customer on success.
pub async fn decode(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
    Json(req): Json<DecodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let customer = ScanService::new(&state, &session)
        .handle_decode(&user, &req.code)
        .await?;
    Ok(Json(customer))
}

/// Pick a customer by hand, skipping the scanner.
pub async fn select(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
    Json(req): Json<SelectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let customer = ScanService::new(&state, &session)
        .handle_select(&user, req.customer_id)
        .await?;
    Ok(Json(customer))
}

/// Confirm the matched customer and open the quantity form.
pub async fn confirm(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let customer_id = ScanService::new(&state, &session).confirm().await?;
    Ok(Json(json!({ "customer_id": customer_id })))
}

/// Submit the quantity form, recording the delivery.
pub async fn submit(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
    Json(req): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let customer_id = ScanService::new(&state, &session).take_submission().await?;

    let delivery = DeliveryRecorder::new(&state)
        .record(&user, customer_id, req.quantity, None)
        .await?;

    Ok((StatusCode::CREATED, Json(delivery)))
}

/// Abandon the scan flow.
pub async fn cancel(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    ScanService::new(&state, &session).cancel().await?;
    Ok(StatusCode::NO_CONTENT)
}
