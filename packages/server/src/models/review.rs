use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::entity::review;
use crate::error::AppError;

/// Longest accepted tasting notes, in characters.
pub const MAX_NOTES_CHARS: usize = 4000;

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[schema(example = 3)]
    pub wine_id: i32,
    /// 1-5 inclusive.
    #[schema(example = 4)]
    pub rating: i32,
    /// Optional tasting notes.
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

/// Full replacement of the mutable fields; omitted optionals clear the value.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    pub rating: i32,
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: i32,
    pub wine_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    /// Number of comments currently attached to this review.
    #[schema(example = 2)]
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewResponse {
    pub fn from_model(m: review::Model, comment_count: i64) -> Self {
        Self {
            id: m.id,
            wine_id: m.wine_id,
            user_id: m.user_id,
            rating: m.rating,
            notes: m.notes,
            image_url: m.image_url,
            comment_count,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Row shape for the list query, comment count included via subquery.
#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListItem {
    pub id: i32,
    pub wine_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReviewListQuery {
    /// Zero-based page number (default 0).
    pub page: Option<u64>,
    /// Page size (default 20, max 100).
    pub size: Option<u64>,
    /// Only reviews of this wine.
    pub wine_id: Option<i32>,
    /// Only reviews by this user.
    pub user_id: Option<i32>,
    /// One of: `rating`, `createdAt`, `updatedAt`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default `asc`).
    pub sort_order: Option<String>,
}

fn validate_rating(rating: i32) -> Result<(), AppError> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation(
            "Rating must be between 1 and 5".into(),
        ));
    }
    Ok(())
}

fn validate_notes(notes: Option<&String>) -> Result<(), AppError> {
    if let Some(notes) = notes
        && notes.chars().count() > MAX_NOTES_CHARS
    {
        return Err(AppError::Validation(format!(
            "Notes must be at most {MAX_NOTES_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn validate_create_review(req: &CreateReviewRequest) -> Result<(), AppError> {
    validate_rating(req.rating)?;
    validate_notes(req.notes.as_ref())
}

pub fn validate_update_review(req: &UpdateReviewRequest) -> Result<(), AppError> {
    validate_rating(req.rating)?;
    validate_notes(req.notes.as_ref())
}
