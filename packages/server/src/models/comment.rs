use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::comment;
use crate::error::AppError;
use crate::models::shared::validate_text;

/// Longest accepted comment, in characters.
pub const MAX_COMMENT_CHARS: usize = 2000;

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[schema(example = 17)]
    pub review_id: i32,
    #[schema(example = "Had the same bottle last week, can confirm.")]
    pub content: String,
}

/// Update addresses the comment by id carried in the body.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    pub id: i32,
    pub content: String,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i32,
    pub review_id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<comment::Model> for CommentResponse {
    fn from(m: comment::Model) -> Self {
        Self {
            id: m.id,
            review_id: m.review_id,
            user_id: m.user_id,
            content: m.content,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CommentListQuery {
    /// Zero-based page number (default 0).
    pub page: Option<u64>,
    /// Page size (default 20, max 100).
    pub size: Option<u64>,
}

pub fn validate_comment_content(content: &str) -> Result<(), AppError> {
    validate_text(content, "Comment text", MAX_COMMENT_CHARS)
}
