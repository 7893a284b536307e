//! Staff management route handlers (owner only).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bluedrop_core::AccountId;

use crate::db::accounts::AccountRepository;
use crate::error::AppError;
use crate::middleware::RequireOwner;
use crate::models::Account;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Staff member as exposed over the API. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct StaffView {
    pub id: AccountId,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for StaffView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            display_name: account.display_name,
            created_at: account.created_at,
        }
    }
}

/// Request to issue a staff invite.
#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: String,
}

/// List the business's staff accounts.
pub async fn list(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
) -> Result<impl IntoResponse, AppError> {
    let staff = AccountRepository::new(state.pool())
        .list_staff(owner.user().business_id)
        .await?;

    let views: Vec<StaffView> = staff.into_iter().map(StaffView::from).collect();
    Ok(Json(views))
}

/// Issue an invite code for a new staff member.
pub async fn invite(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Json(req): Json<InviteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invite = AuthService::new(state.pool())
        .issue_invite(owner.user().business_id, &req.email)
        .await?;

    tracing::info!(invite_id = %invite.id, "staff invite issued");
    Ok((StatusCode::CREATED, Json(invite)))
}

/// Remove a staff account from the business.
pub async fn remove(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(id): Path<AccountId>,
) -> Result<impl IntoResponse, AppError> {
    let removed = AccountRepository::new(state.pool())
        .delete_staff(owner.user().business_id, id)
        .await?;
    if !removed {
        return Err(AppError::NotFound(format!("staff account {id}")));
    }

    tracing::info!(staff_id = %id, "staff account removed");
    Ok(StatusCode::NO_CONTENT)
}
