use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::shared::validate_email;
use crate::models::user::UserSummary;

/// Request body for exchanging a Google ID token for a session.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct GoogleAuthRequest {
    /// Opaque ID token obtained from Google sign-in.
    #[schema(example = "eyJhbGciOiJSUzI1NiIs...")]
    pub token: String,
}

pub fn validate_google_auth_request(payload: &GoogleAuthRequest) -> Result<(), AppError> {
    if payload.token.trim().is_empty() {
        return Err(AppError::Validation("Token must not be blank".into()));
    }
    Ok(())
}

/// Request body for the email-only login path.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Email of an existing account.
    #[schema(example = "alice@example.com")]
    pub email: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    validate_email(&payload.email)
}

/// Successful credential issuance.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    /// Signed session token valid for 7 days.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Public summary of the authenticated user.
    pub user: UserSummary,
}
