use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

use crate::identity::IdentityError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `AUTHENTICATION_FAILED`, `UNAUTHENTICATED`, `FORBIDDEN`, `NOT_FOUND`,
    /// `STORAGE_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description naming the violated constraint.
    #[schema(example = "Rating must be between 1 and 5")]
    pub message: String,
}

/// Application-level error type.
///
/// Domain operations raise the most specific kind available; this type is
/// the single boundary translator from kind to transport code.
#[derive(Debug)]
pub enum AppError {
    /// Malformed input (rating range, blank text, bad upload). 400.
    Validation(String),
    /// The external identity token was rejected or unverifiable. 401.
    Authentication(String),
    /// No valid session credential on a protected route. 403.
    Unauthenticated,
    /// Valid session, but the caller does not own the target resource. 403.
    Forbidden,
    /// A referenced resource does not exist. 404.
    NotFound(String),
    /// The file store failed; distinct from validation. 500.
    Storage(String),
    /// Unexpected failure. 500.
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::Authentication(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "AUTHENTICATION_FAILED",
                    message: msg,
                },
            ),
            AppError::Unauthenticated => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "UNAUTHENTICATED",
                    message: "A valid session credential is required".into(),
                },
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "FORBIDDEN",
                    message: "Only the owner may modify this resource".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Storage(detail) => {
                tracing::error!("File store error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "STORAGE_ERROR",
                        message: "File storage is unavailable".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        AppError::Authentication(err.to_string())
    }
}
