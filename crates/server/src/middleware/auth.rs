//! Authentication extractors.
//!
//! Every protected handler names the capability it needs in its signature:
//! `RequireUser` for any signed-in account, `RequireOwner` for operations
//! only the business owner may perform. An `OwnerSession` can only be
//! obtained through `RequireOwner`, so owner-only service calls cannot be
//! reached from a staff session by construction.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a signed-in account (owner or staff).
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.display_name)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Proof that the current session belongs to a business owner.
///
/// Only `RequireOwner` constructs this type.
#[derive(Debug, Clone)]
pub struct OwnerSession {
    user: CurrentUser,
}

impl OwnerSession {
    /// The signed-in owner.
    #[must_use]
    pub const fn user(&self) -> &CurrentUser {
        &self.user
    }
}

/// Extractor that requires the session to belong to a business owner.
pub struct RequireOwner(pub OwnerSession);

/// Error returned when authentication is required but missing.
pub enum AuthRejection {
    /// No valid session.
    Unauthorized,
    /// Signed in, but the account lacks the owner capability.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Sign in required" })),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Only the business owner can do this" })),
            )
                .into_response(),
        }
    }
}

async fn current_user(parts: &Parts) -> Option<CurrentUser> {
    // Get the session from extensions (set by SessionManagerLayer)
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)
            .await
            .ok_or(AuthRejection::Unauthorized)?;

        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for RequireOwner
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)
            .await
            .ok_or(AuthRejection::Unauthorized)?;

        if !user.is_owner() {
            return Err(AuthRejection::Forbidden);
        }

        Ok(Self(OwnerSession { user }))
    }
}

/// Helper to set the current user in the session after sign-in.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (sign-out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
