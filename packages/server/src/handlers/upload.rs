use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::upload::{UploadResponse, validate_upload};
use crate::state::AppState;

/// Body limit layer for the upload route (32MB). Must stay above the 10 MiB
/// validation cap so oversized files reach the validator.
pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(32 * 1024 * 1024)
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Files",
    operation_id = "uploadFile",
    summary = "Upload an image",
    description = "Validates the `file` multipart part (non-empty, at most \
        10 MiB, declared type image/jpeg, image/png, or image/webp) and stores \
        the bytes. Nothing is written on a validation failure.",
    request_body(content_type = "multipart/form-data", description = "Image upload in the `file` part"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Empty, oversized, or unsupported file (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "File store failure (STORAGE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<(Option<String>, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(|s| s.to_string());
            let content_type = field.content_type().map(|s| s.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
            file = Some((file_name, content_type, data.to_vec()));
            break;
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' part".into()))?;

    let validated = validate_upload(file_name.as_deref(), content_type.as_deref(), &bytes)?;

    let location = state.files.put(&validated.storage_key, &bytes).await?;

    let file_url = format!(
        "{}/{}",
        state.config.storage.public_base_url.trim_end_matches('/'),
        location.key
    );

    Ok(Json(UploadResponse {
        file_name: validated.file_name,
        file_url,
        bucket_key: location.key,
        file_size_bytes: validated.file_size_bytes,
        content_type: validated.content_type,
        uploaded_at: validated.uploaded_at,
    }))
}
