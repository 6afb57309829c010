//! Deletion paths for the resource dependency graph.
//!
//! The graph has two roots with shared descendants:
//!
//! ```text
//! user ──► review ──► comment
//! wine ──► review ──► comment
//! user ──────────────► comment
//! ```
//!
//! Every function here runs against a caller-owned transaction and sweeps
//! leaf-first, so the whole removal commits or rolls back as one unit. The
//! same edges exist as `ON DELETE CASCADE` constraints (see `seed.rs`);
//! this module is the authorized, observable deletion path, the constraints
//! are the storage-layer backstop.
//!
//! Ownership of the root is the caller's responsibility; cascaded children
//! are removed without re-checking ownership, since deleting the parent was
//! already authorized.

use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;

use crate::entity::{comment, review, user, wine};
use crate::error::AppError;

/// Delete a user with all reviews they own, all comments on those reviews,
/// and all comments they authored elsewhere.
pub async fn delete_user(txn: &DatabaseTransaction, user_id: i32) -> Result<(), AppError> {
    comment::Entity::delete_many()
        .filter(
            comment::Column::ReviewId.in_subquery(
                SeaQuery::select()
                    .column(review::Column::Id)
                    .from(review::Entity)
                    .and_where(review::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        )
        .exec(txn)
        .await?;

    comment::Entity::delete_many()
        .filter(comment::Column::UserId.eq(user_id))
        .exec(txn)
        .await?;

    review::Entity::delete_many()
        .filter(review::Column::UserId.eq(user_id))
        .exec(txn)
        .await?;

    let result = user::Entity::delete_by_id(user_id).exec(txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    Ok(())
}

/// Delete a wine with all reviews referencing it and their comments.
pub async fn delete_wine(txn: &DatabaseTransaction, wine_id: i32) -> Result<(), AppError> {
    comment::Entity::delete_many()
        .filter(
            comment::Column::ReviewId.in_subquery(
                SeaQuery::select()
                    .column(review::Column::Id)
                    .from(review::Entity)
                    .and_where(review::Column::WineId.eq(wine_id))
                    .to_owned(),
            ),
        )
        .exec(txn)
        .await?;

    review::Entity::delete_many()
        .filter(review::Column::WineId.eq(wine_id))
        .exec(txn)
        .await?;

    let result = wine::Entity::delete_by_id(wine_id).exec(txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Wine not found".into()));
    }

    Ok(())
}

/// Delete a review with all its comments.
pub async fn delete_review(txn: &DatabaseTransaction, review_id: i32) -> Result<(), AppError> {
    comment::Entity::delete_many()
        .filter(comment::Column::ReviewId.eq(review_id))
        .exec(txn)
        .await?;

    let result = review::Entity::delete_by_id(review_id).exec(txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Review not found".into()));
    }

    Ok(())
}

/// Delete a comment. Comments are leaves; nothing cascades.
pub async fn delete_comment(txn: &DatabaseTransaction, comment_id: i32) -> Result<(), AppError> {
    let result = comment::Entity::delete_by_id(comment_id).exec(txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Comment not found".into()));
    }

    Ok(())
}
