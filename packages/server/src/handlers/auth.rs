use axum::{Json, extract::State};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::auth::{
    AuthResponse, GoogleAuthRequest, LoginRequest, validate_google_auth_request,
    validate_login_request,
};
use crate::models::user::UserSummary;
use crate::state::AppState;
use crate::utils::jwt;

#[utoipa::path(
    post,
    path = "/google",
    tag = "Auth",
    operation_id = "exchangeGoogleToken",
    summary = "Exchange a Google ID token for a session credential",
    description = "Verifies the token against Google, upserts the local user \
        record (display name and avatar refresh on every exchange, keyed by the \
        provider subject id) and issues a signed session token.",
    request_body = GoogleAuthRequest,
    responses(
        (status = 200, description = "Session issued", body = AuthResponse),
        (status = 400, description = "Blank token (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Token rejected by the provider (AUTHENTICATION_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn google_exchange(
    State(state): State<AppState>,
    AppJson(payload): AppJson<GoogleAuthRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate_google_auth_request(&payload)?;

    // Verification happens before any row is touched; a rejected token must
    // never create or mutate a user.
    let identity = state.identity.verify(payload.token.trim()).await?;

    let now = chrono::Utc::now();
    let new_user = user::ActiveModel {
        google_sub: Set(identity.sub.clone()),
        email: Set(identity.email.clone()),
        display_name: Set(identity.display_name.clone()),
        avatar_url: Set(identity.avatar_url.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    // Upsert keyed on the provider subject: repeat exchanges refresh the
    // profile fields instead of inserting a second row.
    user::Entity::insert(new_user)
        .on_conflict(
            OnConflict::column(user::Column::GoogleSub)
                .update_columns([
                    user::Column::DisplayName,
                    user::Column::AvatarUrl,
                    user::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await?;

    let user = user::Entity::find()
        .filter(user::Column::GoogleSub.eq(&identity.sub))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal("user missing after upsert".into()))?;

    let token = jwt::sign(user.id, &user.email, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(AuthResponse {
        token,
        user: UserSummary::from(user),
    }))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "loginByEmail",
    summary = "Issue a session credential by email lookup",
    description = "Development/testing path: looks up an existing user by email \
        with no external verification. Never auto-creates a user.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = AuthResponse),
        (status = 400, description = "Invalid email format (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "No user with that email (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate_login_request(&payload)?;

    let email = payload.email.trim();

    // TODO: return 404 here once clients stop relying on the legacy 500 for
    // unknown emails.
    let user = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal(format!("no user registered with email {email}")))?;

    let token = jwt::sign(user.id, &user.email, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(AuthResponse {
        token,
        user: UserSummary::from(user),
    }))
}
