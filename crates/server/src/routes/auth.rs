//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireUser, clear_current_user, set_current_user};
use crate::services::{auth::AuthService, identity};
use crate::state::AppState;

/// Owner registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterOwnerRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub business_name: String,
    pub default_price: Decimal,
    pub contact_phone: String,
}

/// Staff registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterStaffRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub invite_code: String,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register a business owner and sign them in.
pub async fn register_owner(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<RegisterOwnerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = AuthService::new(state.pool())
        .register_owner(
            &req.email,
            &req.password,
            &req.display_name,
            &req.business_name,
            req.default_price,
            &req.contact_phone,
        )
        .await?;

    let user = identity::resolve(state.pool(), &account).await?;
    set_current_user(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    set_sentry_user(&account.id.to_string(), Some(&account.email));

    tracing::info!(account_id = %account.id, "owner registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Register a staff member against an invite code and sign them in.
pub async fn register_staff(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<RegisterStaffRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = AuthService::new(state.pool())
        .register_staff(&req.email, &req.password, &req.display_name, &req.invite_code)
        .await?;

    let user = identity::resolve(state.pool(), &account).await?;
    set_current_user(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    set_sentry_user(&account.id.to_string(), Some(&account.email));

    tracing::info!(account_id = %account.id, business_id = %user.business_id, "staff registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Sign in with email and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = AuthService::new(state.pool())
        .login(&req.email, &req.password)
        .await?;

    let user = identity::resolve(state.pool(), &account).await?;

    // Rotate the session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session rotation failed: {e}")))?;
    set_current_user(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    set_sentry_user(&account.id.to_string(), Some(&account.email));

    tracing::info!(account_id = %account.id, role = %user.role, "signed in");
    Ok(Json(user))
}

/// Sign out.
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session flush failed: {e}")))?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// Return the signed-in identity.
pub async fn me(RequireUser(user): RequireUser) -> impl IntoResponse {
    Json(user)
}
