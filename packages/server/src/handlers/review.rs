use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{comment, review, wine};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::lifecycle;
use crate::models::review::*;
use crate::models::shared::{Page, page_params};
use crate::state::AppState;

/// Correlated subquery projecting the live comment count of a review row.
const COMMENT_COUNT_EXPR: &str =
    "(SELECT COUNT(*) FROM \"comment\" WHERE \"comment\".\"review_id\" = \"review\".\"id\")";

#[utoipa::path(
    post,
    path = "/",
    tag = "Reviews",
    operation_id = "createReview",
    summary = "Create a review for a wine",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Rating out of range (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "No valid session (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Wine not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, wine_id = payload.wine_id))]
pub async fn create_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_review(&payload)?;

    let txn = state.db.begin().await?;

    // Lock the wine so it cannot be cascade-deleted under the insert.
    wine::Entity::find_by_id(payload.wine_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Wine not found".into()))?;

    let now = chrono::Utc::now();
    let new_review = review::ActiveModel {
        rating: Set(payload.rating),
        notes: Set(payload.notes),
        image_url: Set(payload.image_url),
        user_id: Set(auth_user.user_id),
        wine_id: Set(payload.wine_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_review.insert(&txn).await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse::from_model(model, 0)),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Reviews",
    operation_id = "listReviews",
    summary = "List reviews with filters, sorting, and pagination",
    description = "`wineId` and `userId` filters combine with AND semantics. \
        Unsorted listings come back in stable insertion order.",
    params(ReviewListQuery),
    responses(
        (status = 200, description = "Page of reviews", body = Page<ReviewListItem>),
        (status = 400, description = "Unknown sort field (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<Page<ReviewListItem>>, AppError> {
    let (page, size) = page_params(query.page, query.size);

    let mut select = review::Entity::find();

    if let Some(wine_id) = query.wine_id {
        select = select.filter(review::Column::WineId.eq(wine_id));
    }
    if let Some(user_id) = query.user_id {
        select = select.filter(review::Column::UserId.eq(user_id));
    }

    select = apply_sort(select, query.sort_by.as_deref(), query.sort_order.as_deref())?;

    let total = select.clone().count(&state.db).await?;

    let content = select
        .select_only()
        .column(review::Column::Id)
        .column(review::Column::WineId)
        .column(review::Column::UserId)
        .column(review::Column::Rating)
        .column(review::Column::Notes)
        .column(review::Column::ImageUrl)
        .column_as(Expr::cust(COMMENT_COUNT_EXPR), "comment_count")
        .column(review::Column::CreatedAt)
        .column(review::Column::UpdatedAt)
        .offset(Some(page * size))
        .limit(Some(size))
        .into_model::<ReviewListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(Page::new(content, total, page, size)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Reviews",
    operation_id = "getReview",
    summary = "Get a review by ID",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review details", body = ReviewResponse),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ReviewResponse>, AppError> {
    let model = find_review(&state.db, id).await?;
    let comment_count = comment::Entity::find()
        .filter(comment::Column::ReviewId.eq(id))
        .count(&state.db)
        .await?;

    Ok(Json(ReviewResponse::from_model(model, comment_count as i64)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Reviews",
    operation_id = "updateReview",
    summary = "Replace a review's rating and notes",
    description = "Owner only. A rejected update leaves the stored review \
        unchanged.",
    params(("id" = i32, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 400, description = "Invalid rating (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Not the owner (FORBIDDEN) or no session (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, user_id = auth_user.user_id))]
pub async fn update_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    validate_update_review(&payload)?;

    let txn = state.db.begin().await?;

    let existing = find_review_for_update(&txn, id).await?;
    auth_user.require_owner(&existing)?;

    let mut active: review::ActiveModel = existing.into();
    active.rating = Set(payload.rating);
    active.notes = Set(payload.notes);
    active.image_url = Set(payload.image_url);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;

    let comment_count = comment::Entity::find()
        .filter(comment::Column::ReviewId.eq(id))
        .count(&txn)
        .await?;

    txn.commit().await?;

    Ok(Json(ReviewResponse::from_model(model, comment_count as i64)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Reviews",
    operation_id = "deleteReview",
    summary = "Delete a review",
    description = "Owner only. Removes the review and all its comments in one \
        transaction.",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 403, description = "Not the owner (FORBIDDEN) or no session (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn delete_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_review_for_update(&txn, id).await?;
    auth_user.require_owner(&existing)?;

    lifecycle::delete_review(&txn, id).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

fn apply_sort(
    select: Select<review::Entity>,
    sort_by: Option<&str>,
    sort_order: Option<&str>,
) -> Result<Select<review::Entity>, AppError> {
    let Some(sort_by) = sort_by else {
        return Ok(select.order_by_asc(review::Column::Id));
    };

    let column = match sort_by {
        "rating" => review::Column::Rating,
        "createdAt" => review::Column::CreatedAt,
        "updatedAt" => review::Column::UpdatedAt,
        _ => {
            return Err(AppError::Validation(
                "sortBy must be one of: rating, createdAt, updatedAt".into(),
            ));
        }
    };
    let order = if sort_order == Some("desc") {
        Order::Desc
    } else {
        Order::Asc
    };

    Ok(select.order_by(column, order))
}

async fn find_review<C: ConnectionTrait>(db: &C, id: i32) -> Result<review::Model, AppError> {
    review::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))
}

async fn find_review_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<review::Model, AppError> {
    review::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))
}
