//! Business settings route handlers.

use axum::{Json, extract::State, response::IntoResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::accounts::AccountRepository;
use crate::error::AppError;
use crate::middleware::{RequireOwner, RequireUser, set_current_user};
use crate::state::AppState;

/// Request to save business settings.
#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub business_name: String,
    pub default_price: Decimal,
    pub contact_phone: String,
}

/// Get the business settings.
pub async fn get(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<impl IntoResponse, AppError> {
    let profile = AccountRepository::new(state.pool())
        .get_business(user.business_id)
        .await?
        .ok_or_else(|| AppError::NotFound("business settings".to_owned()))?;
    Ok(Json(profile))
}

/// Save the business settings (owner only).
///
/// The session identity carries a copy of these values, so it is rewritten
/// with the saved profile.
pub async fn update(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    session: Session,
    Json(req): Json<SettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = req.business_name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("business name is required".to_owned()));
    }
    if req.default_price < Decimal::ZERO {
        return Err(AppError::Validation(
            "default price cannot be negative".to_owned(),
        ));
    }

    let profile = AccountRepository::new(state.pool())
        .update_business(
            owner.user().business_id,
            name,
            req.default_price,
            req.contact_phone.trim(),
        )
        .await?;

    let mut user = owner.user().clone();
    user.business_name = profile.business_name.clone();
    user.default_price = profile.default_price;
    user.contact_phone = profile.contact_phone.clone();
    set_current_user(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    Ok(Json(profile))
}
