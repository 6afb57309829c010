use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;
use crate::utils::ownership::{self, Owned, OwnershipDecision};

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require a session. A valid session only
/// proves identity; ownership of a target resource is checked separately via
/// [`AuthUser::require_owner`].
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
}

impl AuthUser {
    /// Returns `Ok(())` if this user owns the resource, `Err(Forbidden)` otherwise.
    pub fn require_owner(&self, resource: &impl Owned) -> Result<(), AppError> {
        match ownership::authorize(self.user_id, resource) {
            OwnershipDecision::Proceed => Ok(()),
            OwnershipDecision::Forbidden => Err(AppError::Forbidden),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthenticated)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthenticated)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::Unauthenticated)?;

        Ok(AuthUser {
            user_id: claims.uid,
            email: claims.sub,
        })
    }
}
