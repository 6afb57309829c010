use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{comment, review};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::lifecycle;
use crate::models::comment::*;
use crate::models::shared::{Page, page_params};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Comments",
    operation_id = "createComment",
    summary = "Comment on a review",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Blank text (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "No valid session (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, review_id = payload.review_id))]
pub async fn create_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_comment_content(&payload.content)?;

    let txn = state.db.begin().await?;

    // Lock the parent review so it cannot be deleted under the insert.
    review::Entity::find_by_id(payload.review_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))?;

    let now = chrono::Utc::now();
    let new_comment = comment::ActiveModel {
        content: Set(payload.content.trim().to_string()),
        user_id: Set(auth_user.user_id),
        review_id: Set(payload.review_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_comment.insert(&txn).await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/",
    tag = "Comments",
    operation_id = "updateComment",
    summary = "Edit a comment",
    description = "Author only. The comment is addressed by the `id` field of \
        the body.",
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 400, description = "Blank text (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Not the author (FORBIDDEN) or no session (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(comment_id = payload.id, user_id = auth_user.user_id))]
pub async fn update_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    validate_comment_content(&payload.content)?;

    let txn = state.db.begin().await?;

    let existing = find_comment_for_update(&txn, payload.id).await?;
    auth_user.require_owner(&existing)?;

    let mut active: comment::ActiveModel = existing.into();
    active.content = Set(payload.content.trim().to_string());
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Comments",
    operation_id = "deleteComment",
    summary = "Delete a comment",
    description = "Author only.",
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the author (FORBIDDEN) or no session (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn delete_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_comment_for_update(&txn, id).await?;
    auth_user.require_owner(&existing)?;

    lifecycle::delete_comment(&txn, id).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Comments",
    operation_id = "listMyComments",
    summary = "List the authenticated user's comments",
    params(CommentListQuery),
    responses(
        (status = 200, description = "Page of comments", body = Page<CommentResponse>),
        (status = 403, description = "No valid session (UNAUTHENTICATED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn list_my_comments(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<Page<CommentResponse>>, AppError> {
    let (page, size) = page_params(query.page, query.size);

    let select = comment::Entity::find()
        .filter(comment::Column::UserId.eq(auth_user.user_id))
        .order_by_asc(comment::Column::Id);

    paginate_comments(&state.db, select, page, size).await
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Comments",
    operation_id = "listReviewComments",
    summary = "List comments on a review",
    params(
        ("id" = i32, Path, description = "Review ID"),
        CommentListQuery,
    ),
    responses(
        (status = 200, description = "Page of comments", body = Page<CommentResponse>),
        (status = 403, description = "No valid session (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query), fields(review_id))]
pub async fn list_review_comments(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<i32>,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<Page<CommentResponse>>, AppError> {
    review::Entity::find_by_id(review_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))?;

    let (page, size) = page_params(query.page, query.size);

    let select = comment::Entity::find()
        .filter(comment::Column::ReviewId.eq(review_id))
        .order_by_asc(comment::Column::Id);

    paginate_comments(&state.db, select, page, size).await
}

async fn paginate_comments(
    db: &DatabaseConnection,
    select: Select<comment::Entity>,
    page: u64,
    size: u64,
) -> Result<Json<Page<CommentResponse>>, AppError> {
    let total = select.clone().count(db).await?;

    let rows = select
        .offset(Some(page * size))
        .limit(Some(size))
        .all(db)
        .await?;

    let content = rows.into_iter().map(CommentResponse::from).collect();

    Ok(Json(Page::new(content, total, page, size)))
}

async fn find_comment_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<comment::Model, AppError> {
    comment::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))
}
