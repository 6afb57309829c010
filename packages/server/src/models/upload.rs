use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

/// Upload size cap: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Content types accepted for upload.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// An upload that passed validation and is ready for storage.
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    pub file_name: String,
    pub storage_key: String,
    pub file_size_bytes: u64,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Metadata returned after a successful upload.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Original filename as submitted.
    #[schema(example = "label.png")]
    pub file_name: String,
    /// Public URL the stored file is reachable at.
    pub file_url: String,
    /// Storage key the bytes were written under.
    pub bucket_key: String,
    #[schema(example = 2048)]
    pub file_size_bytes: u64,
    #[schema(example = "image/png")]
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Validate an uploaded file against the ingestion policy.
///
/// Checks run in order: emptiness, size, declared content type. The first
/// violation is returned and nothing must be written to storage.
pub fn validate_upload(
    file_name: Option<&str>,
    declared_content_type: Option<&str>,
    bytes: &[u8],
) -> Result<ValidatedUpload, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("file is empty".into()));
    }

    if bytes.len() as u64 > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "file exceeds the maximum upload size of {} bytes (10 MiB)",
            MAX_UPLOAD_BYTES
        )));
    }

    let content_type = match declared_content_type {
        None => {
            return Err(AppError::Validation(format!(
                "missing content type; allowed types: {}",
                ALLOWED_CONTENT_TYPES.join(", ")
            )));
        }
        Some(ct) if !ALLOWED_CONTENT_TYPES.contains(&ct) => {
            return Err(AppError::Validation(format!(
                "unsupported content type '{ct}'; allowed types: {}",
                ALLOWED_CONTENT_TYPES.join(", ")
            )));
        }
        Some(ct) => ct.to_string(),
    };

    let file_name = match file_name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => format!("upload{}", extension_for(&content_type)),
    };

    Ok(ValidatedUpload {
        storage_key: storage_key_for(&content_type),
        file_name,
        file_size_bytes: bytes.len() as u64,
        content_type,
        uploaded_at: Utc::now(),
    })
}

/// Derive a fresh storage key. The original filename never reaches storage;
/// the extension comes from the validated content type.
fn storage_key_for(content_type: &str) -> String {
    format!("uploads/{}{}", Uuid::now_v7(), extension_for(content_type))
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/webp" => ".webp",
        _ => "",
    }
}
