use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, extract::State};
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::lifecycle;
use crate::models::user::ProfileResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/me",
    tag = "Users",
    operation_id = "getProfile",
    summary = "Get the authenticated user's profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 403, description = "No valid session (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Account no longer exists (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/me",
    tag = "Users",
    operation_id = "deleteAccount",
    summary = "Delete the authenticated user's account",
    description = "Removes the account together with every review it owns, \
        all comments on those reviews, and all comments it authored elsewhere, \
        in one transaction.",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 403, description = "No valid session (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Account no longer exists (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    // Lock the row so a concurrent delete of the same account observes
    // 404 instead of racing the cascade.
    user::Entity::find_by_id(auth_user.user_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    lifecycle::delete_user(&txn, auth_user.user_id).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
